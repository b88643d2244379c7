// Example: pulling a few fields out of an HTTP response body that arrives in
// chunks, without ever holding the whole body in memory.

use jsoncursor::{BodyEvent, ChunkSource, ChunkStream, Decoder, ParseError};

/// Replays the payloads of a chunked transfer, as a client library would
/// hand them out.
struct ChunkedBody {
    chunks: &'static [&'static [u8]],
    next: usize,
}

impl ChunkSource for ChunkedBody {
    type Chunk = &'static [u8];
    type Error = ();

    fn next_event(&mut self) -> Result<Option<BodyEvent<Self::Chunk>>, ()> {
        let Some(&payload) = self.chunks.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        println!("  <- chunk {} ({} bytes)", self.next, payload.len());
        Ok(Some(BodyEvent::Chunk {
            payload,
            last: self.next == self.chunks.len(),
        }))
    }
}

const CHUNKS: &[&[u8]] = &[
    br#"{"location": {"city": "Tal"#,
    br#"linn", "lat": 59.43, "lon": 24.75}, "cur"#,
    br#"rent": {"temp_c": -4, "humidity": 81, "wind": {"kph": 19, "dir": "SW"}}, "#,
    br#""hourly": [-4, -5, -5, -6, -6, -7, -7, -8], "units": "metric"}"#,
];

fn main() -> Result<(), ParseError<()>> {
    let body = ChunkedBody {
        chunks: CHUNKS,
        next: 0,
    };
    let mut decoder = Decoder::new(ChunkStream::new(body));
    let mut root = decoder.root()?;

    let mut city = [0u8; 32];
    let mut direction = [0u8; 4];

    if let Some(mut location) = root.object_match("location")? {
        if let Some(name) = location.object_match("city")? {
            println!("city: {}", name.string(&mut city)?);
        }
    }

    if let Some(mut current) = root.object_match("current")? {
        while let Some((key, value)) = current.object_match_any(&["temp_c", "humidity", "wind"])? {
            match key {
                "wind" => {
                    let mut wind = value;
                    if let Some(dir) = wind.object_match("dir")? {
                        println!("wind from: {}", dir.string(&mut direction)?);
                    }
                }
                _ => println!("{key}: {}", value.number::<i16>()?),
            }
        }
    }

    if let Some(mut hourly) = root.object_match("hourly")? {
        let mut coldest = i16::MAX;
        let mut hours = 0;
        while let Some(temp) = hourly.array_next()? {
            coldest = coldest.min(temp.number()?);
            hours += 1;
        }
        println!("coldest of the next {hours} hours: {coldest}");
    }

    // "units" is never asked for; finish() drains it and checks the rest.
    decoder.finish()?;
    println!("{} bytes decoded", decoder.consumed());
    Ok(())
}
