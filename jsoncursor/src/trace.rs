// SPDX-License-Identifier: Apache-2.0

//! Optional record of recently consumed input, for error reports only.

/// Receives every byte the decoder consumes.
pub trait TraceSink {
    fn record(&mut self, byte: u8);

    /// The most recent bytes, oldest first, as two slices because ring
    /// storage may wrap.
    fn recent(&self) -> (&[u8], &[u8]) {
        (&[], &[])
    }
}

/// Records nothing. The default for [`Decoder`](crate::Decoder).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    #[inline]
    fn record(&mut self, _byte: u8) {}
}

/// Keeps the last `N` consumed bytes.
#[derive(Debug, Clone)]
pub struct RingTrace<const N: usize> {
    buf: [u8; N],
    next: usize,
    wrapped: bool,
}

impl<const N: usize> RingTrace<N> {
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            next: 0,
            wrapped: false,
        }
    }
}

impl<const N: usize> Default for RingTrace<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TraceSink for RingTrace<N> {
    fn record(&mut self, byte: u8) {
        if let Some(slot) = self.buf.get_mut(self.next) {
            *slot = byte;
            self.next += 1;
            if self.next == N {
                self.next = 0;
                self.wrapped = true;
            }
        }
    }

    fn recent(&self) -> (&[u8], &[u8]) {
        let (head, tail) = self.buf.split_at(self.next);
        if self.wrapped {
            (tail, head)
        } else {
            (head, &[])
        }
    }
}

/// Formats the recent bytes of a sink as escaped ASCII.
pub(crate) struct Recent<'a>(pub (&'a [u8], &'a [u8]));

impl core::fmt::Display for Recent<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (older, newer) = self.0;
        for byte in older.iter().chain(newer.iter()) {
            write!(f, "{}", byte.escape_ascii())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(trace: &impl TraceSink) -> Vec<u8> {
        let (a, b) = trace.recent();
        [a, b].concat()
    }

    #[test]
    fn test_ring_before_wrap() {
        let mut trace = RingTrace::<4>::new();
        trace.record(b'a');
        trace.record(b'b');
        assert_eq!(joined(&trace), b"ab");
    }

    #[test]
    fn test_ring_keeps_last_bytes_in_order() {
        let mut trace = RingTrace::<4>::new();
        for &byte in b"abcdefg" {
            trace.record(byte);
        }
        assert_eq!(joined(&trace), b"defg");
    }

    #[test]
    fn test_zero_sized_ring_and_no_trace() {
        let mut ring = RingTrace::<0>::new();
        ring.record(b'x');
        assert!(joined(&ring).is_empty());
        let mut none = NoTrace;
        none.record(b'x');
        assert!(joined(&none).is_empty());
    }

    #[test]
    fn test_recent_display() {
        let mut trace = RingTrace::<8>::new();
        for &byte in b"[1,\n" {
            trace.record(byte);
        }
        assert_eq!(Recent(trace.recent()).to_string(), "[1,\\n");
    }
}
