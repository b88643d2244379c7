// SPDX-License-Identifier: Apache-2.0

//! Byte sources for the [`Decoder`](crate::Decoder).
//!
//! Anything that can fill a buffer implements [`Reader`]. Two
//! implementations ship with the crate:
//!
//! - [`SliceReader`] over an in-memory slice, optionally limited to a
//!   maximum number of bytes per `read()` to imitate packetised input.
//! - [`IoReader`] over any `std::io::Read` (feature `std`).
//!
//! Chunked HTTP bodies and WebSocket messages go through
//! [`ChunkStream`](crate::ChunkStream) instead.

/// Synchronous byte source.
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Reads into `buf` and returns the number of bytes written.
    ///
    /// # Contract
    /// - A return value of 0 **MUST** indicate true end of stream
    /// - Implementations **MUST NOT** return 0 unless no more data will ever be available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buf)
    }
}

/// A [`Reader`] over a byte slice.
///
/// ```rust
/// use jsoncursor::{Decoder, SliceReader};
///
/// // Hand out at most 3 bytes per read
/// let reader = SliceReader::new(br#"{"status": true}"#, 3);
/// let mut decoder = Decoder::new(reader);
/// let mut root = decoder.root().unwrap();
/// let status = root.object_match("status").unwrap().unwrap();
/// assert_eq!(status.boolean(), Ok(true));
/// ```
#[derive(Debug)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    max_read: usize,
}

impl<'a> SliceReader<'a> {
    /// Each `read()` returns at most `max_read` bytes (minimum 1).
    pub fn new(data: &'a [u8], max_read: usize) -> Self {
        Self {
            data,
            max_read: max_read.max(1),
        }
    }

    /// Reads are only limited by the caller's buffer.
    pub fn full(data: &'a [u8]) -> Self {
        Self {
            data,
            max_read: usize::MAX,
        }
    }

    /// Bytes not handed out yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }
}

impl Reader for SliceReader<'_> {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let count = self.data.len().min(buf.len()).min(self.max_read);
        let (head, rest) = self.data.split_at(count);
        if let Some(dest) = buf.get_mut(..count) {
            dest.copy_from_slice(head);
        }
        self.data = rest;
        Ok(count)
    }
}

/// Adapts a `std::io::Read` into a [`Reader`]. I/O errors pass through as is.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<T>(pub T);

#[cfg(feature = "std")]
impl<T: std::io::Read> Reader for IoReader<T> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf)
    }
}
