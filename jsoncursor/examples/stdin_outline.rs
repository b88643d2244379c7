// Example: print the shape of a JSON document read from standard input.
//
//     echo '{"a": [1, {"b": null}], "c": "d"}' | cargo run --example stdin_outline --features std

use jsoncursor::{
    BitStackConfig, Decoder, DefaultConfig, Element, IoReader, Kind, ParseError, Reader,
    RingTrace, TraceSink,
};

fn outline<R: Reader, C: BitStackConfig, T: TraceSink>(
    mut element: Element<'_, R, C, T>,
    indent: usize,
) -> Result<(), ParseError<R::Error>> {
    let pad = "  ".repeat(indent);
    match element.kind() {
        Kind::Object { .. } => {
            let mut key = [0u8; 64];
            while let Some((name, value)) = element.object_next(&mut key)? {
                println!("{pad}{name}:");
                outline(value, indent + 1)?;
            }
        }
        Kind::Array { .. } => {
            let mut index = 0;
            while let Some(item) = element.array_next()? {
                println!("{pad}[{index}]");
                outline(item, indent + 1)?;
                index += 1;
            }
        }
        Kind::String => {
            let mut buf = [0u8; 256];
            match element.string(&mut buf) {
                Ok(text) => println!("{pad}\"{text}\""),
                Err(ParseError::BufferTooSmall) => println!("{pad}(long string)"),
                Err(e) => return Err(e),
            }
        }
        Kind::Number { .. } => println!("{pad}{}", element.number::<f64>()?),
        Kind::Boolean => println!("{pad}{}", element.boolean()?),
        Kind::Null => {
            element.skip()?;
            println!("{pad}null");
        }
    }
    Ok(())
}

fn run<R: Reader, T: TraceSink>(
    decoder: &mut Decoder<R, DefaultConfig, T>,
) -> Result<(), ParseError<R::Error>> {
    outline(decoder.root()?, 0)?;
    decoder.finish()
}

fn main() {
    let stdin = std::io::stdin().lock();
    let mut decoder = Decoder::with_trace(IoReader(stdin), RingTrace::<32>::new());
    if let Err(e) = run(&mut decoder) {
        let (older, newer) = decoder.trace().recent();
        eprintln!("error: {e}");
        eprintln!("near: {}", String::from_utf8_lossy(&[older, newer].concat()));
        std::process::exit(1);
    }
}
