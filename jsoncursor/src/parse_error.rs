// SPDX-License-Identifier: Apache-2.0

use crate::tokenizer;

/// Errors reported by the [`Decoder`](crate::Decoder) and its elements.
///
/// `E` is the error type of the underlying [`Reader`](crate::Reader); its
/// failures are passed through untouched in [`ParseError::Reader`].
#[derive(Debug, PartialEq)]
pub enum ParseError<E> {
    /// An accessor was called on an element of a different kind.
    WrongElementType,
    /// A number does not fit the requested type.
    Overflow,
    /// A string or key does not fit the caller's buffer.
    BufferTooSmall,
    /// A number lexeme could not be read as the requested type, e.g. `1.5` as `u32`.
    InvalidNumber,
    /// Decoded string content was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// A `\u` escape named a lone or mismatched surrogate.
    InvalidUnicodeCodepoint,
    /// The input is not JSON, or not the JSON the cursor was positioned for.
    MalformedInput(tokenizer::Error),
    /// The reader ran dry in the middle of a value.
    UnexpectedEnd,
    /// The scalar behind this element was already read.
    AlreadyConsumed,
    /// Error from the underlying reader.
    Reader(E),
}

impl<E> From<tokenizer::Error> for ParseError<E> {
    fn from(err: tokenizer::Error) -> Self {
        ParseError::MalformedInput(err)
    }
}

impl<E> From<core::str::Utf8Error> for ParseError<E> {
    fn from(err: core::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for ParseError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::MalformedInput(e) => write!(f, "Malformed input: {e}"),
            ParseError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
            ParseError::Reader(e) => write!(f, "Reader error: {e:?}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for ParseError<E> {}
