// SPDX-License-Identifier: Apache-2.0

//! Pull-based JSON decoding in bounded memory.
//!
//! The input is consumed one byte at a time from a [`Reader`] and only as
//! far as the caller asks. Nothing is allocated: strings are decoded into
//! caller buffers, numbers into a small stack buffer, and nesting is kept
//! in a configurable bit stack.
//!
//! ```rust
//! use jsoncursor::{Decoder, SliceReader};
//!
//! let json = br#"{"sensor": {"id": "t1", "readings": [21, 22, 23]}, "ok": true}"#;
//! let mut decoder = Decoder::new(SliceReader::new(json, 4));
//! let mut root = decoder.root().unwrap();
//!
//! let mut sensor = root.object_match("sensor").unwrap().unwrap();
//! let mut readings = sensor.object_match("readings").unwrap().unwrap();
//! let mut total = 0i32;
//! while let Some(value) = readings.array_next().unwrap() {
//!     total += value.number::<i32>().unwrap();
//! }
//! assert_eq!(total, 66);
//!
//! // The rest of "sensor" is skipped on the way to "ok".
//! assert_eq!(root.object_match("ok").unwrap().unwrap().boolean(), Ok(true));
//! decoder.finish().unwrap();
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

mod chunk_stream;
pub use chunk_stream::{BodyEvent, ChunkSource, ChunkStream};

mod decoder;
pub use decoder::{Decoder, Element, Kind};

mod escape_processor;

mod number;
pub use number::{FromJsonNumber, NumberError};

mod parse_error;
pub use parse_error::ParseError;

mod reader;
#[cfg(feature = "std")]
pub use reader::IoReader;
pub use reader::{Reader, SliceReader};

pub mod tokenizer;
pub use tokenizer::{
    ArrayBitBucket, ArrayBitStack, BitBucket, BitStackConfig, BitStackStruct, DefaultConfig,
    DepthCounter,
};

mod trace;
pub use trace::{NoTrace, RingTrace, TraceSink};
