// SPDX-License-Identifier: Apache-2.0

//! Conversion of number lexemes into Rust numeric types.

/// Why a lexeme could not be converted.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NumberError {
    /// The value does not fit the target type.
    Overflow,
    /// The lexeme has a form the target type cannot represent.
    Invalid,
}

/// A numeric type an [`Element`](crate::Element) can be read as.
pub trait FromJsonNumber: Sized {
    /// Longest lexeme accepted before giving up with an overflow.
    ///
    /// For integers this is the decimal digit count of the type's maximum
    /// plus two, which leaves room for a sign.
    const CAPACITY: usize;

    /// Parses a complete JSON number lexeme.
    fn from_lexeme(lexeme: &[u8]) -> Result<Self, NumberError>;
}

/// Largest capacity over all supported types; sizes the stack scratch buffer.
pub(crate) const MAX_CAPACITY: usize = 64;

const fn decimal_digits(mut value: u128) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

// Negative values are accumulated downwards from zero so that `MIN` parses
// without overflowing, and unsigned types reject them by underflow.
macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl FromJsonNumber for $t {
                const CAPACITY: usize = decimal_digits(<$t>::MAX as u128) + 2;

                fn from_lexeme(lexeme: &[u8]) -> Result<Self, NumberError> {
                    let (negative, digits) = match lexeme {
                        [b'-', rest @ ..] => (true, rest),
                        _ => (false, lexeme),
                    };
                    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
                        return Err(NumberError::Invalid);
                    }
                    let mut result: $t = 0;
                    for &byte in digits {
                        let digit = (byte - b'0') as $t;
                        result = result.checked_mul(10).ok_or(NumberError::Overflow)?;
                        result = if negative {
                            result.checked_sub(digit)
                        } else {
                            result.checked_add(digit)
                        }
                        .ok_or(NumberError::Overflow)?;
                    }
                    Ok(result)
                }
            }
        )*
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

#[cfg(feature = "float")]
macro_rules! impl_float {
    ($($t:ty),*) => {
        $(
            impl FromJsonNumber for $t {
                const CAPACITY: usize = MAX_CAPACITY;

                fn from_lexeme(lexeme: &[u8]) -> Result<Self, NumberError> {
                    let value: $t = core::str::from_utf8(lexeme)
                        .ok()
                        .and_then(|text| text.parse().ok())
                        .ok_or(NumberError::Invalid)?;
                    if value.is_infinite() {
                        return Err(NumberError::Overflow);
                    }
                    Ok(value)
                }
            }
        )*
    };
}

#[cfg(feature = "float")]
impl_float!(f32, f64);
