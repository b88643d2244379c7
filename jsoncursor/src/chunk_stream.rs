// SPDX-License-Identifier: Apache-2.0

//! Flattens an event-based body reader into a [`Reader`].
//!
//! HTTP chunked-transfer decoders and WebSocket message readers hand out
//! bodies as a series of payload events. [`ChunkStream`] turns those into the
//! plain byte stream the [`Decoder`](crate::Decoder) consumes, keeping at most
//! one partially read chunk.
//!
//! ```rust
//! use jsoncursor::{BodyEvent, ChunkSource, ChunkStream, Decoder};
//!
//! struct Frames<'a>(core::slice::Iter<'a, &'static [u8]>);
//!
//! impl ChunkSource for Frames<'_> {
//!     type Chunk = &'static [u8];
//!     type Error = ();
//!
//!     fn next_event(&mut self) -> Result<Option<BodyEvent<Self::Chunk>>, ()> {
//!         let payload = self.0.next();
//!         Ok(payload.map(|&payload| BodyEvent::Chunk {
//!             payload,
//!             last: self.0.len() == 0,
//!         }))
//!     }
//! }
//!
//! let frames: [&'static [u8]; 3] = [b"[1", b"0, 2", b"0]"];
//! let mut decoder = Decoder::new(ChunkStream::new(Frames(frames.iter())));
//! let mut root = decoder.root().unwrap();
//! let mut sum = 0u32;
//! while let Some(item) = root.array_next().unwrap() {
//!     sum += item.number::<u32>().unwrap();
//! }
//! assert_eq!(sum, 30);
//! ```

use crate::Reader;

/// One event from a chunked body reader.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyEvent<C> {
    /// A payload segment; `last` marks the final segment of the body.
    Chunk { payload: C, last: bool },
    /// Anything that is not body payload (trailers, a control frame, ...).
    /// Ends the stream.
    Other,
}

/// Source of body events.
pub trait ChunkSource {
    /// Owned payload of one chunk.
    type Chunk: AsRef<[u8]>;
    type Error;

    /// Next event, or `None` when the body is over.
    fn next_event(&mut self) -> Result<Option<BodyEvent<Self::Chunk>>, Self::Error>;
}

struct Pending<C> {
    payload: C,
    offset: usize,
    last: bool,
}

impl<C: AsRef<[u8]>> Pending<C> {
    fn copy_into(&mut self, buf: &mut [u8]) -> usize {
        let rest = self.payload.as_ref().get(self.offset..).unwrap_or_default();
        let count = rest.len().min(buf.len());
        if let (Some(dest), Some(src)) = (buf.get_mut(..count), rest.get(..count)) {
            dest.copy_from_slice(src);
        }
        self.offset += count;
        count
    }

    fn is_drained(&self) -> bool {
        self.offset >= self.payload.as_ref().len()
    }
}

/// A [`Reader`] over the payloads of a [`ChunkSource`].
///
/// The bytes returned by successive `read()` calls are exactly the
/// concatenated payloads, whatever the chunk boundaries and buffer sizes.
/// Once the body has ended every further `read()` returns `Ok(0)` without
/// touching the source.
pub struct ChunkStream<S: ChunkSource> {
    source: S,
    pending: Option<Pending<S::Chunk>>,
    complete: bool,
}

impl<S: ChunkSource> ChunkStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
            complete: false,
        }
    }

    /// Whether the body has ended and all of it was handed out.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ChunkSource> Reader for ChunkStream<S> {
    type Error = S::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.complete {
                return Ok(0);
            }
            if let Some(pending) = self.pending.as_mut() {
                let copied = pending.copy_into(buf);
                if pending.is_drained() {
                    self.complete = pending.last;
                    self.pending = None;
                }
                // Empty chunks are skipped, 0 is reserved for end of stream.
                if copied > 0 {
                    return Ok(copied);
                }
                continue;
            }
            match self.source.next_event()? {
                Some(BodyEvent::Chunk { payload, last }) => {
                    log::trace!("chunk of {} bytes, last: {last}", payload.as_ref().len());
                    self.pending = Some(Pending {
                        payload,
                        offset: 0,
                        last,
                    });
                }
                Some(BodyEvent::Other) | None => {
                    log::trace!("body ended without a final chunk");
                    self.complete = true;
                }
            }
        }
    }
}
