// SPDX-License-Identifier: Apache-2.0

//! Byte-at-a-time JSON lexer.
//!
//! [`Tokenizer::feed`] takes exactly one byte and answers with a [`Step`]: up
//! to two [`Token`]s and at most one fragment of decoded value [`Content`].
//! No input is ever buffered, so the whole lexer state is the [`State`] value
//! plus the nesting stack.

mod bitstack;

pub use bitstack::{
    ArrayBitBucket, ArrayBitStack, BitBucket, BitStackConfig, BitStackStruct, DefaultConfig,
    DepthCounter,
};

#[derive(Debug, Clone)]
struct Nesting<B, D> {
    depth: D,
    /// `true` bits are objects, `false` bits are arrays
    stack: B,
}

impl<B: BitBucket, D: DepthCounter> Nesting<B, D> {
    fn new() -> Self {
        Nesting {
            depth: D::default(),
            stack: B::default(),
        }
    }

    fn enter(&mut self, object: bool, data: u8, pos: usize) -> Result<(), Error> {
        match self.depth.increment() {
            Some(depth) if depth.as_usize() <= B::CAPACITY => {
                self.stack.push(object);
                self.depth = depth;
                Ok(())
            }
            _ => Error::new(ErrKind::MaxDepthReached, data, pos),
        }
    }

    fn exit(&mut self, object: bool, data: u8, pos: usize) -> Result<(), Error> {
        let Some(depth) = self.depth.decrement() else {
            let kind = if object {
                ErrKind::UnopenedObject
            } else {
                ErrKind::UnopenedArray
            };
            return Error::new(kind, data, pos);
        };
        if self.stack.top() != object {
            return Error::new(ErrKind::MismatchedClose, data, pos);
        }
        self.stack.pop();
        self.depth = depth;
        Ok(())
    }

    fn in_object(&self) -> bool {
        self.depth.as_usize() != 0 && self.stack.top()
    }
}

/// Where the lexer is in the grammar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    /// Nothing but whitespace seen yet.
    TopLevelBegin,
    /// The root value is complete; only whitespace may follow.
    TopLevelEnd,
    /// Just after `[`: a value or `]`.
    ValueBegin,
    /// After `,` in an array or after `:`: a value is required.
    ValueBeginNoClosing,
    /// Just after `{`: a key or `}`.
    KeyBegin,
    /// After `,` in an object: a key is required.
    KeyBeginNoClosing,
    /// After a key: `:` is required.
    ObjectSeparator,
    /// After a value inside a container: `,` or the matching close.
    ValueEnd,
    /// Inside a string. `len` counts raw bytes since the opening quote.
    String { part: Str, key: bool, len: usize },
    /// Inside a number. `len` counts the lexeme bytes seen so far.
    Number { part: Num, len: usize },
    /// Inside `true`, `false` or `null`, with `matched` bytes already seen.
    Literal { literal: Literal, matched: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Str {
    Normal,
    Escape,
    Unicode { digits: u8, value: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Sign,
    LeadingZero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

impl Num {
    /// Whether a number may end in this state.
    const fn is_complete(self) -> bool {
        matches!(
            self,
            Num::LeadingZero | Num::Integer | Num::Fraction | Num::ExponentDigits
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    True,
    False,
    Null,
}

impl Literal {
    const fn as_bytes(self) -> &'static [u8] {
        match self {
            Literal::True => b"true",
            Literal::False => b"false",
            Literal::Null => b"null",
        }
    }

    const fn token(self) -> Token {
        match self {
            Literal::True => Token::True,
            Literal::False => Token::False,
            Literal::Null => Token::Null,
        }
    }
}

/// A completed lexical event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    /// A string or key closed; `len` is the raw byte count between the quotes.
    String { len: usize },
    /// A number ended; `len` is the lexeme length. The terminating byte is
    /// not part of it.
    Number { len: usize },
    True,
    False,
    Null,
    Comma,
    Colon,
}

/// Decoded value bytes produced by a single fed byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Content {
    /// A number lexeme byte, a literal string byte, or a decoded simple escape.
    Byte(u8),
    /// The UTF-16 code unit of a completed `\uXXXX` escape.
    CodeUnit(u16),
}

/// Everything one byte produced.
///
/// Two tokens only appear when a number is terminated by `,`, `]` or `}`:
/// the byte completes the number and is then a separator or close itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Step {
    pub first: Option<Token>,
    pub second: Option<Token>,
    pub content: Option<Content>,
}

impl Step {
    fn push(&mut self, token: Token) {
        if self.first.is_none() {
            self.first = Some(token);
        } else {
            self.second = Some(token);
        }
    }

    /// Tokens in the order they completed.
    pub fn tokens(&self) -> impl Iterator<Item = Token> {
        self.first.into_iter().chain(self.second)
    }

    /// Whether `token` is among this step's tokens.
    pub fn has(&self, token: Token) -> bool {
        self.tokens().any(|t| t == token)
    }
}

/// Which scalar the lexer is currently inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    String,
    Key,
    Number,
    True,
    False,
    Null,
}

#[derive(PartialEq, Clone, Copy)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    InvalidRoot,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    UnopenedArray,
    UnopenedObject,
    MismatchedClose,
    MaxDepthReached,
    InvalidNumber,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedObjectValue,
    ExpectedColon,
    ExpectedArrayItem,
    /// The cursor found the lexer in a state it cannot act on.
    UnexpectedState,
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// The offending byte.
    pub fn character(&self) -> u8 {
        self.character
    }

    /// Offset of the offending byte from the start of input.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind,
            self.character.escape_ascii(),
            self.position
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self, f)
    }
}

const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

const fn hex_value(byte: u8) -> Option<u16> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u16),
        b'a'..=b'f' => Some((byte - b'a' + 10) as u16),
        b'A'..=b'F' => Some((byte - b'A' + 10) as u16),
        _ => None,
    }
}

const fn simple_escape(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}

pub struct Tokenizer<B: BitBucket = u32, D: DepthCounter = u8> {
    state: State,
    consumed: usize,
    nesting: Nesting<B, D>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BitBucket, D: DepthCounter> Tokenizer<B, D> {
    pub fn new() -> Self {
        Tokenizer {
            state: State::TopLevelBegin,
            consumed: 0,
            nesting: Nesting::new(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Number of currently open arrays and objects.
    pub fn depth(&self) -> usize {
        self.nesting.depth.as_usize()
    }

    /// Bytes fed so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Whether a value may start at the next byte.
    pub fn at_value_begin(&self) -> bool {
        matches!(
            self.state,
            State::TopLevelBegin | State::ValueBegin | State::ValueBeginNoClosing
        )
    }

    pub fn scalar(&self) -> Option<Scalar> {
        match self.state {
            State::String { key: true, .. } => Some(Scalar::Key),
            State::String { key: false, .. } => Some(Scalar::String),
            State::Number { .. } => Some(Scalar::Number),
            State::Literal { literal, .. } => Some(match literal {
                Literal::True => Scalar::True,
                Literal::False => Scalar::False,
                Literal::Null => Scalar::Null,
            }),
            _ => None,
        }
    }

    /// Error describing a lexer state the caller did not expect.
    pub fn unexpected(&self, character: u8) -> Error {
        Error {
            kind: ErrKind::UnexpectedState,
            character,
            position: self.consumed,
        }
    }

    /// Feeds one byte.
    pub fn feed(&mut self, byte: u8) -> Result<Step, Error> {
        let pos = self.consumed;
        let mut step = Step::default();
        self.state = self.transition(byte, pos, &mut step)?;
        self.consumed = self.consumed.wrapping_add(1);
        Ok(step)
    }

    /// Signals end of input.
    ///
    /// Completes a number that was still open at the top level. Any other
    /// unfinished value is an error.
    pub fn finish(&mut self) -> Result<Step, Error> {
        let pos = self.consumed;
        match self.state {
            State::TopLevelEnd => Ok(Step::default()),
            State::TopLevelBegin => Error::new(ErrKind::EmptyStream, b' ', pos),
            State::Number { part, len } if part.is_complete() && self.depth() == 0 => {
                self.state = State::TopLevelEnd;
                let mut step = Step::default();
                step.push(Token::Number { len });
                Ok(step)
            }
            _ => Error::new(ErrKind::UnfinishedStream, b' ', pos),
        }
    }

    fn after_value(&self) -> State {
        if self.depth() == 0 {
            State::TopLevelEnd
        } else {
            State::ValueEnd
        }
    }

    fn close(
        &mut self,
        object: bool,
        byte: u8,
        pos: usize,
        step: &mut Step,
    ) -> Result<State, Error> {
        self.nesting.exit(object, byte, pos)?;
        step.push(if object {
            Token::ObjectEnd
        } else {
            Token::ArrayEnd
        });
        Ok(self.after_value())
    }

    fn begin_value(
        &mut self,
        byte: u8,
        pos: usize,
        step: &mut Step,
        otherwise: ErrKind,
    ) -> Result<State, Error> {
        let state = match byte {
            b'[' => {
                self.nesting.enter(false, byte, pos)?;
                step.push(Token::ArrayBegin);
                State::ValueBegin
            }
            b'{' => {
                self.nesting.enter(true, byte, pos)?;
                step.push(Token::ObjectBegin);
                State::KeyBegin
            }
            b'"' => State::String {
                part: Str::Normal,
                key: false,
                len: 0,
            },
            b'-' => {
                step.content = Some(Content::Byte(byte));
                State::Number {
                    part: Num::Sign,
                    len: 1,
                }
            }
            b'0' => {
                step.content = Some(Content::Byte(byte));
                State::Number {
                    part: Num::LeadingZero,
                    len: 1,
                }
            }
            b'1'..=b'9' => {
                step.content = Some(Content::Byte(byte));
                State::Number {
                    part: Num::Integer,
                    len: 1,
                }
            }
            b't' | b'f' | b'n' => State::Literal {
                literal: match byte {
                    b't' => Literal::True,
                    b'f' => Literal::False,
                    _ => Literal::Null,
                },
                matched: 1,
            },
            _ => return Error::new(otherwise, byte, pos),
        };
        Ok(state)
    }

    fn transition(&mut self, byte: u8, pos: usize, step: &mut Step) -> Result<State, Error> {
        let state = match (self.state, byte) {
            (
                State::TopLevelBegin
                | State::TopLevelEnd
                | State::ValueBegin
                | State::ValueBeginNoClosing
                | State::KeyBegin
                | State::KeyBeginNoClosing
                | State::ObjectSeparator
                | State::ValueEnd,
                b' ' | b'\t' | b'\n' | b'\r',
            ) => self.state,

            (State::TopLevelBegin, _) => self.begin_value(byte, pos, step, ErrKind::InvalidRoot)?,
            (State::TopLevelEnd, _) => return Error::new(ErrKind::ContentEnded, byte, pos),

            (State::ValueBegin, b']') => self.close(false, byte, pos, step)?,
            (State::ValueBegin, _) => {
                self.begin_value(byte, pos, step, ErrKind::ExpectedArrayItem)?
            }
            (State::ValueBeginNoClosing, b']' | b'}') if !self.nesting.in_object() => {
                return Error::new(ErrKind::TrailingComma, byte, pos)
            }
            (State::ValueBeginNoClosing, _) => {
                let otherwise = if self.nesting.in_object() {
                    ErrKind::ExpectedObjectValue
                } else {
                    ErrKind::ExpectedArrayItem
                };
                self.begin_value(byte, pos, step, otherwise)?
            }

            (State::KeyBegin, b'}') => self.close(true, byte, pos, step)?,
            (State::KeyBeginNoClosing, b'}') => {
                return Error::new(ErrKind::TrailingComma, byte, pos)
            }
            (State::KeyBegin | State::KeyBeginNoClosing, b'"') => State::String {
                part: Str::Normal,
                key: true,
                len: 0,
            },
            (State::KeyBegin | State::KeyBeginNoClosing, _) => {
                return Error::new(ErrKind::ExpectedObjectKey, byte, pos)
            }

            (State::ObjectSeparator, b':') => {
                step.push(Token::Colon);
                State::ValueBeginNoClosing
            }
            (State::ObjectSeparator, _) => return Error::new(ErrKind::ExpectedColon, byte, pos),

            (State::ValueEnd, b',') => {
                step.push(Token::Comma);
                if self.nesting.in_object() {
                    State::KeyBeginNoClosing
                } else {
                    State::ValueBeginNoClosing
                }
            }
            (State::ValueEnd, b']') => self.close(false, byte, pos, step)?,
            (State::ValueEnd, b'}') => self.close(true, byte, pos, step)?,
            (State::ValueEnd, _) if self.nesting.in_object() => {
                return Error::new(ErrKind::ExpectedObjectValue, byte, pos)
            }
            (State::ValueEnd, _) => return Error::new(ErrKind::ExpectedArrayItem, byte, pos),

            (
                State::String {
                    part: Str::Normal,
                    key,
                    len,
                },
                b'"',
            ) => {
                step.push(Token::String { len });
                if key {
                    State::ObjectSeparator
                } else {
                    self.after_value()
                }
            }
            (
                State::String {
                    part: Str::Normal,
                    key,
                    len,
                },
                b'\\',
            ) => State::String {
                part: Str::Escape,
                key,
                len: len + 1,
            },
            (
                State::String {
                    part: Str::Normal, ..
                },
                b'\x00'..=b'\x1F',
            ) => return Error::new(ErrKind::UnescapedControlCharacter, byte, pos),
            (
                State::String {
                    part: Str::Normal,
                    key,
                    len,
                },
                _,
            ) => {
                step.content = Some(Content::Byte(byte));
                State::String {
                    part: Str::Normal,
                    key,
                    len: len + 1,
                }
            }
            (
                State::String {
                    part: Str::Escape,
                    key,
                    len,
                },
                b'u',
            ) => State::String {
                part: Str::Unicode {
                    digits: 0,
                    value: 0,
                },
                key,
                len: len + 1,
            },
            (
                State::String {
                    part: Str::Escape,
                    key,
                    len,
                },
                _,
            ) => match simple_escape(byte) {
                Some(decoded) => {
                    step.content = Some(Content::Byte(decoded));
                    State::String {
                        part: Str::Normal,
                        key,
                        len: len + 1,
                    }
                }
                None => return Error::new(ErrKind::InvalidStringEscape, byte, pos),
            },
            (
                State::String {
                    part: Str::Unicode { digits, value },
                    key,
                    len,
                },
                _,
            ) => {
                let Some(nibble) = hex_value(byte) else {
                    return Error::new(ErrKind::InvalidUnicodeEscape, byte, pos);
                };
                let value = (value << 4) | nibble;
                if digits == 3 {
                    step.content = Some(Content::CodeUnit(value));
                    State::String {
                        part: Str::Normal,
                        key,
                        len: len + 1,
                    }
                } else {
                    State::String {
                        part: Str::Unicode {
                            digits: digits + 1,
                            value,
                        },
                        key,
                        len: len + 1,
                    }
                }
            }

            (State::Number { part, len }, _) => {
                let next = match (part, byte) {
                    (Num::Sign, b'0') => Some(Num::LeadingZero),
                    (Num::Sign, b'1'..=b'9') => Some(Num::Integer),
                    (Num::LeadingZero | Num::Integer, b'.') => Some(Num::Point),
                    (Num::Integer, b'0'..=b'9') => Some(Num::Integer),
                    (Num::Point | Num::Fraction, b'0'..=b'9') => Some(Num::Fraction),
                    (Num::LeadingZero | Num::Integer | Num::Fraction, b'e' | b'E') => {
                        Some(Num::Exponent)
                    }
                    (Num::Exponent, b'+' | b'-') => Some(Num::ExponentSign),
                    (Num::Exponent | Num::ExponentSign | Num::ExponentDigits, b'0'..=b'9') => {
                        Some(Num::ExponentDigits)
                    }
                    _ => None,
                };
                match next {
                    Some(part) => {
                        step.content = Some(Content::Byte(byte));
                        State::Number { part, len: len + 1 }
                    }
                    None if part.is_complete()
                        && (is_whitespace(byte) || matches!(byte, b',' | b']' | b'}')) =>
                    {
                        step.push(Token::Number { len });
                        // The terminator is a byte of the enclosing container.
                        self.state = self.after_value();
                        self.transition(byte, pos, step)?
                    }
                    None => return Error::new(ErrKind::InvalidNumber, byte, pos),
                }
            }

            (State::Literal { literal, matched }, _) => {
                let expected = literal.as_bytes();
                if expected.get(matched as usize) != Some(&byte) {
                    return Error::new(ErrKind::InvalidToken, byte, pos);
                }
                let matched = matched + 1;
                if matched as usize == expected.len() {
                    step.push(literal.token());
                    self.after_value()
                } else {
                    State::Literal { literal, matched }
                }
            }
        };
        Ok(state)
    }
}
