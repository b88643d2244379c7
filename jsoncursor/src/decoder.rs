// SPDX-License-Identifier: Apache-2.0

//! The decoding session and its element cursor.
//!
//! A [`Decoder`] owns the byte source and the tokenizer. Values are reached
//! through [`Element`]s, short-lived handles that mutably borrow the decoder
//! (or their parent element), so only one of them can be read at a time.
//! Container closure is detected by comparing the tokenizer's live nesting
//! depth with the depth recorded when the element was created.

use crate::escape_processor::UnicodeEscapeCollector;
use crate::number::{FromJsonNumber, NumberError, MAX_CAPACITY};
use crate::tokenizer::{
    self, BitStackConfig, Content, DefaultConfig, Scalar, State, Step, Token, Tokenizer,
};
use crate::trace::{NoTrace, Recent, TraceSink};
use crate::{ParseError, Reader};

type DecodeResult<V, R> = Result<V, ParseError<<R as Reader>::Error>>;

/// What an [`Element`] holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    /// An object; `depth` is the nesting depth just inside its `{`.
    Object { depth: usize },
    /// An array; `depth` is the nesting depth just inside its `[`.
    Array { depth: usize },
    String,
    /// A number whose first lexeme byte was consumed while classifying it.
    Number { first: u8 },
    Boolean,
    Null,
}

impl Kind {
    pub fn is_null(&self) -> bool {
        matches!(self, Kind::Null)
    }
}

/// Pull-based decoding session over a [`Reader`].
///
/// Input is read one byte at a time and only as far as the current
/// accessor needs.
///
/// ```rust
/// use jsoncursor::{Decoder, SliceReader};
///
/// let json = br#"{"id": 7, "tags": ["a", "b"], "name": "widget"}"#;
/// let mut decoder = Decoder::new(SliceReader::full(json));
/// let mut root = decoder.root().unwrap();
///
/// let id: u32 = root.object_match("id").unwrap().unwrap().number().unwrap();
/// assert_eq!(id, 7);
///
/// let mut buf = [0u8; 16];
/// let name = root.object_match("name").unwrap().unwrap();
/// assert_eq!(name.string(&mut buf).unwrap(), "widget");
/// ```
pub struct Decoder<R: Reader, C: BitStackConfig = DefaultConfig, T: TraceSink = NoTrace> {
    tokenizer: Tokenizer<C::Bucket, C::Counter>,
    reader: R,
    trace: T,
    root: Option<Kind>,
    /// A root scalar accessor has started reading.
    root_claimed: bool,
    last_byte: u8,
}

impl<R: Reader> Decoder<R> {
    /// Creates a decoder with 32 levels of nesting and no byte trace.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, NoTrace)
    }
}

impl<R: Reader, T: TraceSink> Decoder<R, DefaultConfig, T> {
    /// Creates a decoder that reports every consumed byte to `trace`.
    ///
    /// ```rust
    /// use jsoncursor::{Decoder, RingTrace, SliceReader, TraceSink};
    ///
    /// let mut decoder = Decoder::with_trace(SliceReader::full(b"[1, 2]"), RingTrace::<4>::new());
    /// decoder.finish().unwrap();
    /// let (older, newer) = decoder.trace().recent();
    /// assert_eq!([older, newer].concat(), b", 2]");
    /// ```
    pub fn with_trace(reader: R, trace: T) -> Self {
        Self::with_config(reader, trace)
    }
}

impl<R: Reader, C: BitStackConfig, T: TraceSink> Decoder<R, C, T> {
    /// Creates a decoder with a custom nesting configuration.
    ///
    /// ```rust
    /// use jsoncursor::{BitStackStruct, Decoder, NoTrace, SliceReader};
    ///
    /// // 64 levels of nesting
    /// let reader = SliceReader::full(b"[[[]]]");
    /// let mut decoder = Decoder::<_, BitStackStruct<u64, u8>>::with_config(reader, NoTrace);
    /// decoder.finish().unwrap();
    /// ```
    pub fn with_config(reader: R, trace: T) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            reader,
            trace,
            root: None,
            root_claimed: false,
            last_byte: b' ',
        }
    }

    /// The top-level value.
    ///
    /// The first call classifies it; later calls hand out a new cursor for
    /// the same value, positioned wherever reading left off.
    pub fn root(&mut self) -> DecodeResult<Element<'_, R, C, T>, R> {
        let kind = match self.root {
            Some(kind) => kind,
            None => {
                let Some(kind) = self.begin_value()? else {
                    return self.unexpected();
                };
                self.root = Some(kind);
                kind
            }
        };
        Ok(Element {
            decoder: self,
            kind,
            root: true,
        })
    }

    /// Drains whatever is left of the document and checks that nothing but
    /// whitespace follows it.
    pub fn finish(&mut self) -> DecodeResult<(), R> {
        let kind = match self.root {
            Some(kind) => kind,
            None => self.root()?.kind(),
        };
        self.skip_value(kind)?;
        while let Some(byte) = self.read_byte()? {
            self.tokenizer.feed(byte).map_err(|e| self.malformed(e))?;
        }
        self.tokenizer.finish().map_err(|e| self.malformed(e))?;
        Ok(())
    }

    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Bytes consumed from the reader so far.
    pub fn consumed(&self) -> usize {
        self.tokenizer.consumed()
    }

    pub fn into_reader(self) -> R {
        self.reader
    }

    fn read_byte(&mut self) -> DecodeResult<Option<u8>, R> {
        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte).map_err(ParseError::Reader)? {
            0 => Ok(None),
            _ => {
                self.trace.record(byte[0]);
                self.last_byte = byte[0];
                Ok(Some(byte[0]))
            }
        }
    }

    /// Feeds the next byte to the tokenizer. End of input is only acceptable
    /// when it completes a top-level number.
    fn advance(&mut self) -> DecodeResult<Step, R> {
        match self.read_byte()? {
            Some(byte) => self.tokenizer.feed(byte).map_err(|e| self.malformed(e)),
            None => match self.tokenizer.finish() {
                Ok(step) if step.first.is_some() => Ok(step),
                _ => {
                    log::debug!(
                        "unexpected end of input after {} bytes",
                        self.tokenizer.consumed()
                    );
                    Err(ParseError::UnexpectedEnd)
                }
            },
        }
    }

    fn malformed(&self, err: tokenizer::Error) -> ParseError<R::Error> {
        log::debug!(
            "malformed input: {err}, recent input \"{}\"",
            Recent(self.trace.recent())
        );
        ParseError::MalformedInput(err)
    }

    fn unexpected<V>(&self) -> DecodeResult<V, R> {
        Err(self.malformed(self.tokenizer.unexpected(self.last_byte)))
    }

    /// Reads up to the start of the next value and classifies it.
    ///
    /// Returns `None` if the enclosing array closes instead.
    fn begin_value(&mut self) -> DecodeResult<Option<Kind>, R> {
        while self.tokenizer.at_value_begin() {
            let step = self.advance()?;
            if step.has(Token::ArrayBegin) {
                return Ok(Some(Kind::Array {
                    depth: self.tokenizer.depth(),
                }));
            }
            if step.has(Token::ObjectBegin) {
                return Ok(Some(Kind::Object {
                    depth: self.tokenizer.depth(),
                }));
            }
            if step.has(Token::ArrayEnd) {
                return Ok(None);
            }
            let kind = match (self.tokenizer.scalar(), step.content) {
                (None, _) => continue,
                (Some(Scalar::String), _) => Kind::String,
                (Some(Scalar::Number), Some(Content::Byte(first))) => Kind::Number { first },
                (Some(Scalar::True | Scalar::False), _) => Kind::Boolean,
                (Some(Scalar::Null), _) => Kind::Null,
                _ => break,
            };
            log::trace!("{kind:?} at byte {}", self.tokenizer.consumed());
            return Ok(Some(kind));
        }
        self.unexpected()
    }

    /// Consumes the rest of a value without surfacing it.
    fn skip_value(&mut self, kind: Kind) -> DecodeResult<(), R> {
        log::trace!("skipping {kind:?}");
        match kind {
            Kind::Array { depth } | Kind::Object { depth } => {
                while self.tokenizer.depth() >= depth {
                    self.advance()?;
                }
            }
            _ => {
                while self.tokenizer.scalar().is_some() {
                    self.advance()?;
                }
            }
        }
        Ok(())
    }

    /// Drains an abandoned child of the container at `depth`, leaving the
    /// tokenizer between two of the container's entries, or past its close.
    fn settle(&mut self, depth: usize) -> DecodeResult<(), R> {
        while self.tokenizer.depth() > depth || self.tokenizer.scalar().is_some() {
            self.advance()?;
        }
        Ok(())
    }

    /// Reads the rest of a string, handing decoded UTF-8 to `sink` in
    /// fragments of at most four bytes.
    fn read_string(
        &mut self,
        mut sink: impl FnMut(&[u8]) -> DecodeResult<(), R>,
    ) -> DecodeResult<(), R> {
        let mut unicode = UnicodeEscapeCollector::new();
        loop {
            let step = self.advance()?;
            if let Some(Token::String { .. }) = step.first {
                return unicode
                    .expect_complete()
                    .map_err(|_| ParseError::InvalidUnicodeCodepoint);
            }
            match step.content {
                Some(Content::Byte(byte)) => {
                    unicode
                        .expect_complete()
                        .map_err(|_| ParseError::InvalidUnicodeCodepoint)?;
                    sink(&[byte])?;
                }
                Some(Content::CodeUnit(unit)) => {
                    let decoded = unicode
                        .push(unit)
                        .map_err(|_| ParseError::InvalidUnicodeCodepoint)?;
                    if let Some(ch) = decoded {
                        let mut utf8 = [0u8; 4];
                        sink(ch.encode_utf8(&mut utf8).as_bytes())?;
                    }
                }
                None => {}
            }
        }
    }

    /// Moves to the next key of the object at `depth` and stops just inside
    /// its opening quote. Returns `false` once the object has closed.
    fn enter_key(&mut self, depth: usize) -> DecodeResult<bool, R> {
        self.settle(depth)?;
        while self.tokenizer.depth() >= depth {
            match *self.tokenizer.state() {
                State::String { key: true, .. } => return Ok(true),
                State::KeyBegin | State::KeyBeginNoClosing | State::ValueEnd => {
                    self.advance()?;
                }
                // An entry whose key was read but whose value never was.
                State::ObjectSeparator | State::ValueBeginNoClosing => {
                    self.skip_separator()?;
                    let Some(kind) = self.begin_value()? else {
                        return self.unexpected();
                    };
                    self.skip_value(kind)?;
                }
                _ => return self.unexpected(),
            }
        }
        Ok(false)
    }

    /// Consumes the `:` after a key.
    fn skip_separator(&mut self) -> DecodeResult<(), R> {
        while !self.tokenizer.at_value_begin() {
            if *self.tokenizer.state() != State::ObjectSeparator {
                return self.unexpected();
            }
            self.advance()?;
        }
        Ok(())
    }

    /// Skips the separator after a key and classifies the value behind it.
    fn begin_entry_value(&mut self) -> DecodeResult<Kind, R> {
        self.skip_separator()?;
        match self.begin_value()? {
            Some(kind) => Ok(kind),
            None => self.unexpected(),
        }
    }
}

fn append<E>(buf: &mut [u8], len: &mut usize, bytes: &[u8]) -> Result<(), ParseError<E>> {
    let end = *len + bytes.len();
    let dest = buf.get_mut(*len..end).ok_or(ParseError::BufferTooSmall)?;
    dest.copy_from_slice(bytes);
    *len = end;
    Ok(())
}

/// Cursor over one JSON value.
///
/// Scalar accessors consume the element. Container accessors take
/// `&mut self` and return children that borrow it, so a parent cannot move
/// on while a child is still in use. A child dropped before it was fully
/// read is skipped by the parent's next call.
pub struct Element<'d, R: Reader, C: BitStackConfig = DefaultConfig, T: TraceSink = NoTrace> {
    decoder: &'d mut Decoder<R, C, T>,
    kind: Kind,
    root: bool,
}

impl<R: Reader, C: BitStackConfig, T: TraceSink> Element<'_, R, C, T> {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Starts reading a scalar. The root can only be read once, even if
    /// the first attempt failed half way.
    fn expect_scalar(&mut self, scalar: &[Scalar]) -> DecodeResult<Scalar, R> {
        if self.root {
            if self.decoder.root_claimed {
                return Err(ParseError::AlreadyConsumed);
            }
            self.decoder.root_claimed = true;
        }
        match self.decoder.tokenizer.scalar() {
            Some(current) if scalar.contains(&current) => Ok(current),
            _ => Err(ParseError::AlreadyConsumed),
        }
    }

    pub fn boolean(mut self) -> DecodeResult<bool, R> {
        if self.kind != Kind::Boolean {
            return Err(ParseError::WrongElementType);
        }
        let value = self.expect_scalar(&[Scalar::True, Scalar::False])? == Scalar::True;
        self.decoder.skip_value(self.kind)?;
        Ok(value)
    }

    /// Like [`boolean`](Self::boolean), but `null` reads as `None`.
    pub fn optional_boolean(self) -> DecodeResult<Option<bool>, R> {
        match self.kind {
            Kind::Null => self.null().map(|_| None),
            _ => self.boolean().map(Some),
        }
    }

    /// Reads the number as `V`.
    ///
    /// The lexeme is collected in a fixed stack buffer of `V::CAPACITY`
    /// bytes. A longer lexeme, or a value outside `V`'s range, is
    /// [`ParseError::Overflow`].
    pub fn number<V: FromJsonNumber>(mut self) -> DecodeResult<V, R> {
        let Kind::Number { first } = self.kind else {
            return Err(ParseError::WrongElementType);
        };
        self.expect_scalar(&[Scalar::Number])?;
        let capacity = V::CAPACITY.min(MAX_CAPACITY);
        let mut scratch = [0u8; MAX_CAPACITY];
        let mut len = 0;
        append(&mut scratch, &mut len, &[first])?;
        loop {
            let step = self.decoder.advance()?;
            if let Some(Token::Number { .. }) = step.first {
                break;
            }
            let Some(Content::Byte(byte)) = step.content else {
                return self.decoder.unexpected();
            };
            if len >= capacity {
                log::debug!("number longer than {capacity} bytes");
                return Err(ParseError::Overflow);
            }
            append(&mut scratch, &mut len, &[byte])?;
        }
        V::from_lexeme(scratch.get(..len).unwrap_or_default()).map_err(|e| match e {
            NumberError::Overflow => ParseError::Overflow,
            NumberError::Invalid => ParseError::InvalidNumber,
        })
    }

    /// Like [`number`](Self::number), but `null` reads as `None`.
    pub fn optional_number<V: FromJsonNumber>(self) -> DecodeResult<Option<V>, R> {
        match self.kind {
            Kind::Null => self.null().map(|_| None),
            _ => self.number().map(Some),
        }
    }

    /// Decodes the string into `buf` and returns it.
    ///
    /// Escapes are resolved. A string longer than `buf` is
    /// [`ParseError::BufferTooSmall`].
    pub fn string<'b>(mut self, buf: &'b mut [u8]) -> DecodeResult<&'b str, R> {
        if self.kind != Kind::String {
            return Err(ParseError::WrongElementType);
        }
        self.expect_scalar(&[Scalar::String])?;
        let mut len = 0;
        self.decoder
            .read_string(|bytes| append(buf, &mut len, bytes))?;
        let buf: &'b [u8] = buf;
        Ok(core::str::from_utf8(buf.get(..len).unwrap_or_default())?)
    }

    /// Like [`string`](Self::string), but `null` reads as `None`.
    pub fn optional_string<'b>(self, buf: &'b mut [u8]) -> DecodeResult<Option<&'b str>, R> {
        match self.kind {
            Kind::Null => self.null().map(|_| None),
            _ => self.string(buf).map(Some),
        }
    }

    fn null(mut self) -> DecodeResult<(), R> {
        self.expect_scalar(&[Scalar::Null])?;
        self.decoder.skip_value(self.kind)
    }

    /// Next item of an array, or `None` once the array has closed.
    pub fn array_next(&mut self) -> DecodeResult<Option<Element<'_, R, C, T>>, R> {
        let Kind::Array { depth } = self.kind else {
            return Err(ParseError::WrongElementType);
        };
        self.decoder.settle(depth)?;
        while self.decoder.tokenizer.depth() >= depth {
            match *self.decoder.tokenizer.state() {
                State::ValueEnd => {
                    self.decoder.advance()?;
                }
                State::ValueBegin | State::ValueBeginNoClosing => {
                    return match self.decoder.begin_value()? {
                        Some(kind) => Ok(Some(Element {
                            decoder: &mut *self.decoder,
                            kind,
                            root: false,
                        })),
                        None => Ok(None),
                    };
                }
                _ => return self.decoder.unexpected(),
            }
        }
        Ok(None)
    }

    /// Scans forward to the entry named `key` and returns its value.
    ///
    /// Entries passed over are skipped. Returns `None` once the object has
    /// closed without a match.
    pub fn object_match(&mut self, key: &str) -> DecodeResult<Option<Element<'_, R, C, T>>, R> {
        Ok(self.object_match_any(&[key])?.map(|(_, value)| value))
    }

    /// Scans forward to the next entry whose key is one of `keys` and returns
    /// that key with the value.
    ///
    /// All candidates are matched against the key in a single pass; a
    /// candidate wins only if it equals the whole key, so `"foo"` and
    /// `"foobar"` are told apart.
    pub fn object_match_any<'k, const N: usize>(
        &mut self,
        keys: &[&'k str; N],
    ) -> DecodeResult<Option<(&'k str, Element<'_, R, C, T>)>, R> {
        let Kind::Object { depth } = self.kind else {
            return Err(ParseError::WrongElementType);
        };
        while self.decoder.enter_key(depth)? {
            let mut alive = [true; N];
            let mut seen = 0usize;
            self.decoder.read_string(|bytes| {
                for &byte in bytes {
                    for (live, key) in alive.iter_mut().zip(keys) {
                        *live = *live && key.as_bytes().get(seen) == Some(&byte);
                    }
                    seen += 1;
                }
                Ok(())
            })?;
            let winner = keys
                .iter()
                .zip(alive)
                .find(|(key, live)| *live && key.len() == seen)
                .map(|(key, _)| *key);
            let kind = self.decoder.begin_entry_value()?;
            match winner {
                Some(key) => {
                    log::trace!("matched key {key:?}");
                    return Ok(Some((
                        key,
                        Element {
                            decoder: &mut *self.decoder,
                            kind,
                            root: false,
                        },
                    )));
                }
                None => self.decoder.skip_value(kind)?,
            }
        }
        Ok(None)
    }

    /// Next entry of an object with its key decoded into `key`, or `None`
    /// once the object has closed.
    pub fn object_next<'b>(
        &mut self,
        key: &'b mut [u8],
    ) -> DecodeResult<Option<(&'b str, Element<'_, R, C, T>)>, R> {
        let Kind::Object { depth } = self.kind else {
            return Err(ParseError::WrongElementType);
        };
        if !self.decoder.enter_key(depth)? {
            return Ok(None);
        }
        let mut len = 0;
        self.decoder
            .read_string(|bytes| append(key, &mut len, bytes))?;
        let key: &'b [u8] = key;
        let name = core::str::from_utf8(key.get(..len).unwrap_or_default())?;
        let kind = self.decoder.begin_entry_value()?;
        Ok(Some((
            name,
            Element {
                decoder: &mut *self.decoder,
                kind,
                root: false,
            },
        )))
    }

    /// Consumes the rest of this value without looking at it.
    pub fn skip(self) -> DecodeResult<(), R> {
        self.decoder.skip_value(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceReader;
    use test_log::test;

    fn open(json: &[u8]) -> Decoder<SliceReader<'_>> {
        Decoder::new(SliceReader::full(json))
    }

    #[test]
    fn test_root_classification() {
        let cases: [(&[u8], Kind); 7] = [
            (b"  {}", Kind::Object { depth: 1 }),
            (b"[]", Kind::Array { depth: 1 }),
            (b"\"s\"", Kind::String),
            (b"-1", Kind::Number { first: b'-' }),
            (b"7", Kind::Number { first: b'7' }),
            (b"false", Kind::Boolean),
            (b"\nnull", Kind::Null),
        ];
        for (json, kind) in cases {
            let mut decoder = open(json);
            assert_eq!(decoder.root().unwrap().kind(), kind);
            decoder.finish().unwrap();
        }
    }

    #[test]
    fn test_root_is_memoized() {
        let mut decoder = open(b"[1, 2]");
        assert_eq!(decoder.root().unwrap().kind(), Kind::Array { depth: 1 });
        assert_eq!(decoder.root().unwrap().kind(), Kind::Array { depth: 1 });
        assert_eq!(decoder.consumed(), 1);

        let mut root = decoder.root().unwrap();
        assert_eq!(root.array_next().unwrap().unwrap().number::<u8>(), Ok(1));
        let mut root = decoder.root().unwrap();
        assert_eq!(root.array_next().unwrap().unwrap().number::<u8>(), Ok(2));
        assert!(root.array_next().unwrap().is_none());
    }

    #[test]
    fn test_consumed_scalar_cannot_be_reread() {
        let mut decoder = open(b"true");
        assert_eq!(decoder.root().unwrap().boolean(), Ok(true));
        assert_eq!(
            decoder.root().unwrap().boolean(),
            Err(ParseError::AlreadyConsumed)
        );
    }

    #[test]
    fn test_root_number_is_not_reread_after_overflow() {
        let mut decoder = open(b"1234567");
        assert_eq!(
            decoder.root().unwrap().number::<u8>(),
            Err(ParseError::Overflow)
        );
        assert_eq!(
            decoder.root().unwrap().number::<u64>(),
            Err(ParseError::AlreadyConsumed)
        );
        decoder.finish().unwrap();
    }

    #[test]
    fn test_root_string_is_not_reread_after_short_buffer() {
        let mut decoder = open(b"\"abcdefgh\"");
        let mut short = [0u8; 3];
        assert_eq!(
            decoder.root().unwrap().string(&mut short),
            Err(ParseError::BufferTooSmall)
        );
        let mut buf = [0u8; 32];
        assert_eq!(
            decoder.root().unwrap().string(&mut buf),
            Err(ParseError::AlreadyConsumed)
        );
        assert_eq!(
            decoder.root().unwrap().optional_string(&mut buf),
            Err(ParseError::AlreadyConsumed)
        );
        decoder.finish().unwrap();
    }

    #[test]
    fn test_wrong_element_type() {
        let mut decoder = open(b"\"text\"");
        let root = decoder.root().unwrap();
        assert_eq!(root.number::<u8>(), Err(ParseError::WrongElementType));
        let mut root = decoder.root().unwrap();
        assert!(matches!(
            root.array_next(),
            Err(ParseError::WrongElementType)
        ));
        assert!(matches!(
            root.object_match("x"),
            Err(ParseError::WrongElementType)
        ));
        let mut buf = [0u8; 8];
        assert_eq!(decoder.root().unwrap().string(&mut buf), Ok("text"));
    }

    #[test]
    fn test_optional_accessors() {
        let mut decoder = open(b"[null, 5, null, \"x\", null, false]");
        let mut root = decoder.root().unwrap();
        let mut buf = [0u8; 4];

        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_number::<u8>(), Ok(None));
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_number::<u8>(), Ok(Some(5)));
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_string(&mut buf), Ok(None));
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_string(&mut buf), Ok(Some("x")));
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_boolean(), Ok(None));
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.optional_boolean(), Ok(Some(false)));
        assert!(root.array_next().unwrap().is_none());
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let json = r#""tab\there \"q\" é 😀 \/""#;
        let mut decoder = open(json.as_bytes());
        let mut buf = [0u8; 64];
        assert_eq!(
            decoder.root().unwrap().string(&mut buf),
            Ok("tab\there \"q\" é 😀 /")
        );
    }

    #[test]
    fn test_string_buffer_too_small() {
        let mut buf = [0u8; 5];
        let mut decoder = open(b"\"abcdef\"");
        assert_eq!(
            decoder.root().unwrap().string(&mut buf),
            Err(ParseError::BufferTooSmall)
        );
        let mut decoder = open(b"\"abcde\"");
        assert_eq!(decoder.root().unwrap().string(&mut buf), Ok("abcde"));
    }

    #[test]
    fn test_lone_surrogate() {
        let mut buf = [0u8; 8];
        let cases: [&[u8]; 3] = [br#""\ud800x""#, br#""\udc00""#, br#""\ud800""#];
        for json in cases {
            let mut decoder = open(json);
            assert_eq!(
                decoder.root().unwrap().string(&mut buf),
                Err(ParseError::InvalidUnicodeCodepoint)
            );
        }
    }

    #[test]
    fn test_number_longer_than_capacity() {
        let mut decoder = open(b"[1000000]");
        let mut root = decoder.root().unwrap();
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.number::<u8>(), Err(ParseError::Overflow));
    }

    #[test]
    fn test_fraction_as_integer_is_invalid() {
        let mut decoder = open(b"2.5");
        assert_eq!(
            decoder.root().unwrap().number::<i32>(),
            Err(ParseError::InvalidNumber)
        );
    }

    #[cfg(feature = "float")]
    #[test]
    fn test_float() {
        let mut decoder = open(b"{\"pi\": 3.25e0}");
        let mut root = decoder.root().unwrap();
        let pi = root.object_match("pi").unwrap().unwrap();
        assert_eq!(pi.number::<f64>(), Ok(3.25));
        decoder.finish().unwrap();
    }

    #[test]
    fn test_unexpected_end() {
        let mut decoder = open(b"[1, 2");
        let mut root = decoder.root().unwrap();
        root.array_next().unwrap().unwrap().skip().unwrap();
        let item = root.array_next().unwrap().unwrap();
        assert_eq!(item.number::<u8>(), Err(ParseError::UnexpectedEnd));

        let mut decoder = open(b"");
        assert!(matches!(decoder.root(), Err(ParseError::UnexpectedEnd)));
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let mut decoder = open(b"[1, }");
        let mut root = decoder.root().unwrap();
        root.array_next().unwrap().unwrap().skip().unwrap();
        match root.array_next() {
            Err(ParseError::MalformedInput(err)) => {
                assert_eq!(err.kind(), tokenizer::ErrKind::TrailingComma);
                assert_eq!(err.position(), 4);
            }
            Err(other) => panic!("Expected MalformedInput, got {other:?}"),
            Ok(_) => panic!("Expected MalformedInput, got an element"),
        }
    }

    #[test]
    fn test_object_next_iterates_entries() {
        let mut decoder = open(br#"{"a": 1, "b\n": [true], "c": {"d": null}}"#);
        let mut root = decoder.root().unwrap();
        let mut key = [0u8; 8];
        let mut entries = Vec::new();
        while let Some((name, value)) = root.object_next(&mut key).unwrap() {
            entries.push((name.to_owned(), value.kind()));
        }
        assert_eq!(
            entries,
            [
                ("a".to_owned(), Kind::Number { first: b'1' }),
                ("b\n".to_owned(), Kind::Array { depth: 2 }),
                ("c".to_owned(), Kind::Object { depth: 2 }),
            ]
        );
        decoder.finish().unwrap();
    }

    #[test]
    fn test_object_next_key_too_long() {
        let mut decoder = open(br#"{"longer": 1}"#);
        let mut root = decoder.root().unwrap();
        let mut key = [0u8; 3];
        assert!(matches!(
            root.object_next(&mut key),
            Err(ParseError::BufferTooSmall)
        ));
    }

    #[test]
    fn test_escaped_key_matches() {
        let mut decoder = open(br#"{"fo": 1, "f\u006fo": 3}"#);
        let mut root = decoder.root().unwrap();
        let value = root.object_match("foo").unwrap().unwrap();
        assert_eq!(value.number::<u8>(), Ok(3));
    }

    #[test]
    fn test_finish_rejects_trailing_content() {
        let mut decoder = open(b"{} {}");
        match decoder.finish() {
            Err(ParseError::MalformedInput(err)) => {
                assert_eq!(err.kind(), tokenizer::ErrKind::ContentEnded)
            }
            other => panic!("Expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_reader_errors_pass_through() {
        struct Failing;
        impl Reader for Failing {
            type Error = &'static str;
            fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
                Err("timeout")
            }
        }
        let mut decoder = Decoder::new(Failing);
        assert!(matches!(decoder.root(), Err(ParseError::Reader("timeout"))));
    }
}
