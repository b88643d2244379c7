// SPDX-License-Identifier: Apache-2.0

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use jsoncursor::{BitStackConfig, Element, Kind, ParseError, Reader, TraceSink};

pub type Walked<E> = Result<(), ParseError<E>>;

/// Reads every value below `element` and writes it back out as compact JSON.
/// Numbers are read as `i64`, strings must fit in 32 bytes.
pub fn walk<R: Reader, C: BitStackConfig, T: TraceSink>(
    mut element: Element<'_, R, C, T>,
    out: &mut String,
) -> Walked<R::Error> {
    match element.kind() {
        Kind::Object { .. } => {
            out.push('{');
            let mut key = [0u8; 32];
            let mut first = true;
            while let Some((name, value)) = element.object_next(&mut key)? {
                if !first {
                    out.push(',');
                }
                first = false;
                out.push_str(&format!("\"{name}\":"));
                walk(value, out)?;
            }
            out.push('}');
        }
        Kind::Array { .. } => {
            out.push('[');
            let mut first = true;
            while let Some(item) = element.array_next()? {
                if !first {
                    out.push(',');
                }
                first = false;
                walk(item, out)?;
            }
            out.push(']');
        }
        Kind::String => {
            let mut buf = [0u8; 32];
            out.push_str(&format!("\"{}\"", element.string(&mut buf)?));
        }
        Kind::Number { .. } => out.push_str(&element.number::<i64>()?.to_string()),
        Kind::Boolean => out.push_str(&element.boolean()?.to_string()),
        Kind::Null => {
            element.skip()?;
            out.push_str("null");
        }
    }
    Ok(())
}

/// Reads only the first entry of every container and abandons the rest.
pub fn first_only<R: Reader, C: BitStackConfig, T: TraceSink>(
    mut element: Element<'_, R, C, T>,
    out: &mut String,
) -> Walked<R::Error> {
    match element.kind() {
        Kind::Object { .. } => {
            let mut key = [0u8; 32];
            if let Some((name, value)) = element.object_next(&mut key)? {
                out.push_str(name);
                first_only(value, out)?;
            }
            Ok(())
        }
        Kind::Array { .. } => match element.array_next()? {
            Some(item) => first_only(item, out),
            None => Ok(()),
        },
        _ => walk(element, out),
    }
}

/// Removes insignificant whitespace from JSON that has no spaces inside
/// strings.
pub fn compact(json: &str) -> String {
    json.chars().filter(|c| !c.is_whitespace()).collect()
}
