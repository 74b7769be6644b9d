//! Byte-level glue between files and the unit-level converters.

use std::io::{Read, Seek, Write};

use anyhow::{bail, Context, Result};
use tracing::debug;
use utf_codec::{
    convert_to_vec, ByteOrder, CodeUnit, ConvertOptions, Encoding, LineReader, UnicodeForm, Utf16,
    Utf32, Utf8,
};

/// Encoding names accepted on the command line.
pub const ENCODING_NAMES: &[&str] = &[
    "utf8", "utf16", "utf16le", "utf16be", "utf32", "utf32le", "utf32be",
];

/// An encoding plus the byte order its units are stored in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Format {
    pub encoding: Encoding,
    pub order: ByteOrder,
}

impl Format {
    /// Parses one of `ENCODING_NAMES`.  Plain "utf16" and "utf32" mean host
    /// byte order.
    pub fn parse(name: &str) -> Result<Format> {
        let (encoding, order) = match name {
            "utf8" => (Encoding::Utf8, ByteOrder::Native),
            "utf16" => (Encoding::Utf16, ByteOrder::Native),
            "utf16le" => (Encoding::Utf16, ByteOrder::little()),
            "utf16be" => (Encoding::Utf16, ByteOrder::big()),
            "utf32" => (Encoding::Utf32, ByteOrder::Native),
            "utf32le" => (Encoding::Utf32, ByteOrder::little()),
            "utf32be" => (Encoding::Utf32, ByteOrder::big()),
            _ => bail!("unknown encoding {:?}", name),
        };
        Ok(Format { encoding, order })
    }
}

fn bytes_to_units<F: UnicodeForm>(bytes: &[u8], order: ByteOrder) -> Result<Vec<F::Unit>> {
    let width = F::ENCODING.unit_width();
    if bytes.len() % width != 0 {
        bail!(
            "input is {} bytes long, which isn't a whole number of {}-byte {:?} code units",
            bytes.len(),
            width,
            F::ENCODING
        );
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|b| order.apply(<F::Unit as CodeUnit>::from_ne_slice(b)))
        .collect())
}

fn units_to_bytes<U: CodeUnit>(units: &[U], order: ByteOrder) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(units.len() * U::WIDTH);
    for &unit in units {
        order.apply(unit).extend_ne_bytes(&mut bytes);
    }
    bytes
}

fn convert_bytes<S: UnicodeForm, D: UnicodeForm>(
    input: &[u8],
    from: ByteOrder,
    to: ByteOrder,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let src = bytes_to_units::<S>(input, from)?;
    let dst = convert_to_vec::<S, D>(&src, options).context("failed to convert input")?;
    debug!(input_units = src.len(), output_units = dst.len(), "converted");
    Ok(units_to_bytes(&dst, to))
}

/// Converts a whole encoded byte buffer from one format to another.
///
/// Converting a format to itself still validates the input.
pub fn transcode(
    input: &[u8],
    from: Format,
    to: Format,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let (f, t) = (from.order, to.order);
    match (from.encoding, to.encoding) {
        (Encoding::Utf8, Encoding::Utf8) => convert_bytes::<Utf8, Utf8>(input, f, t, options),
        (Encoding::Utf8, Encoding::Utf16) => convert_bytes::<Utf8, Utf16>(input, f, t, options),
        (Encoding::Utf8, Encoding::Utf32) => convert_bytes::<Utf8, Utf32>(input, f, t, options),
        (Encoding::Utf16, Encoding::Utf8) => convert_bytes::<Utf16, Utf8>(input, f, t, options),
        (Encoding::Utf16, Encoding::Utf16) => convert_bytes::<Utf16, Utf16>(input, f, t, options),
        (Encoding::Utf16, Encoding::Utf32) => convert_bytes::<Utf16, Utf32>(input, f, t, options),
        (Encoding::Utf32, Encoding::Utf8) => convert_bytes::<Utf32, Utf8>(input, f, t, options),
        (Encoding::Utf32, Encoding::Utf16) => convert_bytes::<Utf32, Utf16>(input, f, t, options),
        (Encoding::Utf32, Encoding::Utf32) => convert_bytes::<Utf32, Utf32>(input, f, t, options),
    }
}

/// Settings for `write_lines()`.
#[derive(Debug, Copy, Clone)]
pub struct LineSettings {
    pub chunk_bytes: usize,
    pub number: bool,
    pub options: ConvertOptions,
}

fn write_lines_as<F: UnicodeForm, R: Read + Seek, W: Write>(
    source: R,
    order: ByteOrder,
    settings: &LineSettings,
    out: &mut W,
) -> Result<usize> {
    let reader = LineReader::<R, F::Unit>::with_byte_order(source, order)
        .chunk_size(settings.chunk_bytes);

    let mut count = 0;
    for line in reader {
        count += 1;
        let line = line.with_context(|| format!("failed to read line {}", count))?;
        let text = convert_to_vec::<F, Utf8>(line.units(), &settings.options)
            .with_context(|| format!("failed to convert line {}", count))?;
        if settings.number {
            write!(out, "{:>6}\t", count)?;
        }
        out.write_all(&text)?;
    }
    Ok(count)
}

/// Reads `source` line by line in the given format, writing each line to
/// `out` as utf8.  Returns the number of lines written.
pub fn write_lines<R: Read + Seek, W: Write>(
    source: R,
    format: Format,
    settings: &LineSettings,
    out: &mut W,
) -> Result<usize> {
    match format.encoding {
        Encoding::Utf8 => write_lines_as::<Utf8, R, W>(source, format.order, settings, out),
        Encoding::Utf16 => write_lines_as::<Utf16, R, W>(source, format.order, settings, out),
        Encoding::Utf32 => write_lines_as::<Utf32, R, W>(source, format.order, settings, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn format(name: &str) -> Format {
        Format::parse(name).unwrap()
    }

    #[test]
    fn parse_01() {
        for name in ENCODING_NAMES.iter() {
            assert!(Format::parse(name).is_ok(), "{}", name);
        }
        assert!(Format::parse("latin1").is_err());
        assert_eq!(format("utf16").order, ByteOrder::Native);
        assert_ne!(format("utf16le").order, format("utf16be").order);
        assert_eq!(format("utf32be").encoding, Encoding::Utf32);
    }

    #[test]
    fn transcode_01() {
        let out = transcode(
            "A😺".as_bytes(),
            format("utf8"),
            format("utf16be"),
            &ConvertOptions::new(),
        )
        .unwrap();
        assert_eq!(out, [0x00, 0x41, 0xD8, 0x3D, 0xDE, 0x3A]);
    }

    #[test]
    fn transcode_02() {
        let input = [0x41, 0x00, 0x00, 0x00, 0x3A, 0xF6, 0x01, 0x00];
        let out = transcode(
            &input,
            format("utf32le"),
            format("utf8"),
            &ConvertOptions::new(),
        )
        .unwrap();
        assert_eq!(out, "A😺".as_bytes());
    }

    #[test]
    fn transcode_03() {
        // Byte order only.
        let out = transcode(
            &[0x00, 0x41, 0x00, 0x42],
            format("utf16be"),
            format("utf16le"),
            &ConvertOptions::new(),
        )
        .unwrap();
        assert_eq!(out, [0x41, 0x00, 0x42, 0x00]);
    }

    #[test]
    fn transcode_error_01() {
        let result = transcode(
            &[0x41, 0x00, 0x42],
            format("utf16le"),
            format("utf8"),
            &ConvertOptions::new(),
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("3 bytes"), "{}", message);
        assert!(message.contains("2-byte Utf16"), "{}", message);
    }

    #[test]
    fn transcode_error_02() {
        let result = transcode(
            b"ok\xFF",
            format("utf8"),
            format("utf8"),
            &ConvertOptions::strict(),
        );
        assert!(result.is_err());

        let out = transcode(
            b"ok\xFF",
            format("utf8"),
            format("utf8"),
            &ConvertOptions::new(),
        )
        .unwrap();
        assert_eq!(out, b"ok?");
    }

    #[test]
    fn write_lines_01() {
        let source = Cursor::new(units_to_bytes(
            &"one\r\ntwo\nthree".encode_utf16().collect::<Vec<_>>(),
            ByteOrder::big(),
        ));
        let settings = LineSettings {
            chunk_bytes: 4,
            number: true,
            options: ConvertOptions::new(),
        };
        let mut out = Vec::new();
        let count = write_lines(source, format("utf16be"), &settings, &mut out).unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "     1\tone\n     2\ttwo\n     3\tthree"
        );
    }

    #[test]
    fn write_lines_02() {
        let settings = LineSettings {
            chunk_bytes: 8192,
            number: false,
            options: ConvertOptions::new(),
        };
        let mut out = Vec::new();
        let source = Cursor::new(Vec::<u8>::new());
        let count = write_lines(source, format("utf8"), &settings, &mut out).unwrap();
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }
}
