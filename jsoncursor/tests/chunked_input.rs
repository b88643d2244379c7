// SPDX-License-Identifier: Apache-2.0

//! Decoding documents that arrive as a chunked body.

mod common;

use std::collections::VecDeque;

use common::{compact, walk};
use jsoncursor::{BodyEvent, ChunkSource, ChunkStream, Decoder, ParseError, Reader};
use test_log::test;

/// Body events replayed from a list, counting how often it is polled.
struct Recorded {
    events: VecDeque<Result<BodyEvent<Vec<u8>>, &'static str>>,
    polls: usize,
}

impl Recorded {
    /// `payload` cut at `cuts`, the last piece flagged final.
    fn split(payload: &[u8], cuts: &[usize]) -> Self {
        let mut events = VecDeque::new();
        let mut start = 0;
        for &cut in cuts.iter().chain(Some(&payload.len())) {
            events.push_back(Ok(BodyEvent::Chunk {
                payload: payload[start..cut].to_vec(),
                last: cut == payload.len(),
            }));
            start = cut;
        }
        Recorded { events, polls: 0 }
    }
}

impl ChunkSource for Recorded {
    type Chunk = Vec<u8>;
    type Error = &'static str;

    fn next_event(&mut self) -> Result<Option<BodyEvent<Vec<u8>>>, Self::Error> {
        self.polls += 1;
        self.events.pop_front().transpose()
    }
}

const DOCUMENT: &str = r#"{"id":42,"tags":["a","b"],"nested":{"ok":true,"n":null},"list":[[1],[-2,3]]}"#;

#[test]
fn test_every_two_and_three_way_split_decodes_the_same() {
    let payload = DOCUMENT.as_bytes();
    let expected = compact(DOCUMENT);
    for first in 0..=payload.len() {
        for second in first..=payload.len() {
            let stream = ChunkStream::new(Recorded::split(payload, &[first, second]));
            let mut decoder = Decoder::new(stream);
            let mut out = String::new();
            walk(decoder.root().unwrap(), &mut out).unwrap();
            decoder.finish().unwrap();
            assert_eq!(out, expected, "cuts at {first} and {second}");
            assert!(decoder.into_reader().is_complete());
        }
    }
}

#[test]
fn test_one_byte_chunks() {
    let payload = DOCUMENT.as_bytes();
    let cuts: Vec<usize> = (1..payload.len()).collect();
    let mut decoder = Decoder::new(ChunkStream::new(Recorded::split(payload, &cuts)));
    let mut root = decoder.root().unwrap();
    let id = root.object_match("id").unwrap().unwrap();
    assert_eq!(id.number::<u16>(), Ok(42));
    let mut list = root.object_match("list").unwrap().unwrap();
    let mut inner = list.array_next().unwrap().unwrap();
    assert_eq!(inner.array_next().unwrap().unwrap().number::<i8>(), Ok(1));
}

#[test]
fn test_decoder_stops_reading_at_the_value_it_needs() {
    let payload = br#"{"first": 1, "second": 2}"#;
    let source = Recorded::split(payload, &[12]);
    let mut decoder = Decoder::new(ChunkStream::new(source));
    let mut root = decoder.root().unwrap();
    let first = root.object_match("first").unwrap().unwrap();
    assert_eq!(first.number::<u8>(), Ok(1));
    // The number ended at the comma, the last byte of the first chunk.
    assert_eq!(decoder.consumed(), 12);
    assert_eq!(decoder.into_reader().into_inner().polls, 1);
}

#[test]
fn test_truncated_body_is_unexpected_end() {
    let payload = br#"{"a": [1, 2"#;
    let mut decoder = Decoder::new(ChunkStream::new(Recorded::split(payload, &[4])));
    let mut out = String::new();
    let root = decoder.root().unwrap();
    assert_eq!(walk(root, &mut out), Err(ParseError::UnexpectedEnd));
}

#[test]
fn test_source_error_reaches_the_caller() {
    let mut source = Recorded::split(b"", &[]);
    source.events.clear();
    source.events.push_back(Ok(BodyEvent::Chunk {
        payload: b"[1, ".to_vec(),
        last: false,
    }));
    source.events.push_back(Err("connection reset"));

    let mut decoder = Decoder::new(ChunkStream::new(source));
    let mut root = decoder.root().unwrap();
    assert_eq!(root.array_next().unwrap().unwrap().number::<u8>(), Ok(1));
    assert!(matches!(
        root.array_next(),
        Err(ParseError::Reader("connection reset"))
    ));
}

#[test]
fn test_other_event_ends_body() {
    let mut source = Recorded::split(b"", &[]);
    source.events.clear();
    source.events.push_back(Ok(BodyEvent::Chunk {
        payload: b"[true".to_vec(),
        last: false,
    }));
    source.events.push_back(Ok(BodyEvent::Other));

    let mut stream = ChunkStream::new(source);
    let mut decoder = Decoder::new(&mut stream);
    assert!(matches!(decoder.finish(), Err(ParseError::UnexpectedEnd)));

    let mut buf = [0u8; 4];
    assert_eq!(stream.read(&mut buf), Ok(0));
    assert!(stream.is_complete());
}
