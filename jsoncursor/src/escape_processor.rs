// SPDX-License-Identifier: Apache-2.0

/// A `\u` escape sequence that does not name a Unicode scalar value.
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) struct InvalidCodepoint;

/// Joins `\uXXXX` code units into chars, pairing UTF-16 surrogates.
#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeCollector {
    high: Option<u16>,
}

impl UnicodeEscapeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes one code unit. Returns the char once it is complete.
    pub fn push(&mut self, unit: u16) -> Result<Option<char>, InvalidCodepoint> {
        let code = match (self.high.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high = Some(unit);
                return Ok(None);
            }
            (None, 0xDC00..=0xDFFF) => return Err(InvalidCodepoint),
            (None, _) => u32::from(unit),
            (Some(high), 0xDC00..=0xDFFF) => {
                0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00)
            }
            (Some(_), _) => return Err(InvalidCodepoint),
        };
        char::from_u32(code).map(Some).ok_or(InvalidCodepoint)
    }

    /// Checks that no high surrogate is waiting for its pair. Called before
    /// any content that is not a `\u` escape, and at the end of the string.
    pub fn expect_complete(&self) -> Result<(), InvalidCodepoint> {
        match self.high {
            Some(_) => Err(InvalidCodepoint),
            None => Ok(()),
        }
    }
}
