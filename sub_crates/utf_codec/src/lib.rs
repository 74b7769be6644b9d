//! A library for converting text between utf8, utf16, and utf32, and for
//! reading lines out of encoded byte streams.
//!
//! There are three layers:
//!
//! - Per-code-point transcoders in the `utf8`, `utf16`, and `utf32`
//!   modules.
//! - Bulk converters (`utf8_to_utf16()` and friends) that convert a whole
//!   input slice into a caller-supplied output slice.  Output is always
//!   zero-terminated within the bounds of the output slice, and the way
//!   invalid or truncated input is handled is controlled per call with
//!   `ConvertOptions`.
//! - A line reader (`LineReader`, `read_line_utf16()`, etc.) that reads
//!   one line at a time from any `Read + Seek` source, folding CRLF into
//!   LF and never consuming bytes past the end of the line.
//!
//! Each bulk converter comes in two flavors: a counted one that converts
//! the entire input slice (embedded zeros included), and an `_until_nul`
//! one that stops at the first zero unit.

mod convert;
mod line_buf;
mod line_reader;
mod options;
mod units;
pub mod utf16;
pub mod utf32;
pub mod utf8;

use thiserror::Error;

pub use convert::{
    convert, convert_to_vec, convert_until_nul, utf16_to_utf16, utf16_to_utf16_until_nul,
    utf16_to_utf32, utf16_to_utf32_until_nul, utf16_to_utf8, utf16_to_utf8_until_nul,
    utf32_to_utf16, utf32_to_utf16_until_nul, utf32_to_utf32, utf32_to_utf32_until_nul,
    utf32_to_utf8, utf32_to_utf8_until_nul, utf8_to_utf16, utf8_to_utf16_until_nul,
    utf8_to_utf32, utf8_to_utf32_until_nul, utf8_to_utf8, utf8_to_utf8_until_nul, Decoded,
    UnicodeForm, Utf16, Utf32, Utf8,
};
pub use line_reader::{
    read_line_utf16, read_line_utf16_swapped, read_line_utf32, read_line_utf32_swapped,
    read_line_utf8, Line, LineError, LineReader, DEFAULT_CHUNK_BYTES,
};
pub use options::{ConvertOptions, Truncation, DEFAULT_CHAR};
pub use units::{
    compare_until_nul, compare_until_nul_n, nul_len, until_nul, ByteOrder, CodeUnit, Encoding,
};

/// The largest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Result type for the bulk converters.
///
/// The Ok() variant provides the number of units written to the output
/// buffer *including* the zero terminator.  So an empty conversion returns
/// `Ok(1)`.
pub type ConvertResult = Result<usize, ConvertError>;

/// Represents a failed bulk conversion.
///
/// In every case the output buffer has been zero-terminated directly after
/// the last unit written, as long as it has room for at least one unit.
/// It is guaranteed that all input leading up to the problem has already
/// been converted and written to the output buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The input contains a unit or group that can't be decoded, and no
    /// default character was configured to substitute for it.
    ///
    /// `error_range` is the index range of the offending input units.
    #[error("invalid input at units {error_range:?} ({output_units_written} units written)")]
    Invalid {
        error_range: (usize, usize),
        output_units_written: usize,
    },

    /// The output buffer filled up before all input was converted.
    ///
    /// `input_units_consumed` is how much of the input made it into the
    /// output, so the caller can retry the rest with a larger buffer.
    #[error(
        "output buffer too small: {input_units_consumed} input units consumed, \
         {output_units_written} units written"
    )]
    InsufficientBuffer {
        input_units_consumed: usize,
        output_units_written: usize,
    },

    /// The input ends in the middle of a multi-unit group.  Only reported
    /// when `Truncation::Report` is in effect.
    ///
    /// `error_range` covers the incomplete group at the end of the input.
    #[error("input truncated within units {error_range:?} ({output_units_written} units written)")]
    Truncated {
        error_range: (usize, usize),
        output_units_written: usize,
    },
}

impl ConvertError {
    /// Number of data units (not counting the terminator) that were
    /// written to the output buffer before the error.
    pub fn output_units_written(&self) -> usize {
        match *self {
            ConvertError::Invalid {
                output_units_written,
                ..
            }
            | ConvertError::InsufficientBuffer {
                output_units_written,
                ..
            }
            | ConvertError::Truncated {
                output_units_written,
                ..
            } => output_units_written,
        }
    }
}
