//! Bulk conversion between utf8, utf16, and utf32 buffers.
//!
//! All converters share the same contract:
//!
//! - The last unit of `dst` is reserved for the zero terminator, so at
//!   most `dst.len() - 1` units of data are written.
//! - On success the output is zero-terminated and `Ok(n)` is returned,
//!   where `n` is the number of units written including the terminator.
//! - On failure the output written so far is still zero-terminated.
//! - A code point is either written in full or not at all.

use tracing::debug;

use crate::options::{ConvertOptions, Truncation};
use crate::units::{nul_len, CodeUnit, Encoding};
use crate::{utf16, utf32, utf8, ConvertError, ConvertResult};

/// Result of decoding the group at the start of an input slice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A valid code point, encoded with `len` units.
    Scalar { code: u32, len: usize },
    /// `len` units that don't form a valid code point.
    Invalid { len: usize },
    /// The input ends partway through an otherwise valid-looking group.
    Truncated,
}

/// One of the three Unicode encoding forms.
pub trait UnicodeForm {
    type Unit: CodeUnit;

    const ENCODING: Encoding;

    /// Decodes the group at the start of `input`.  `input` must not be
    /// empty.
    fn decode_group(input: &[Self::Unit]) -> Decoded;

    /// Encodes `code` into the front of `out`, returning the number of
    /// units used, or `None` if `code` can't be encoded.
    fn encode(code: u32, out: &mut [Self::Unit; 4]) -> Option<usize>;
}

/// Marker for utf8 (`u8` units).
#[derive(Debug, Copy, Clone)]
pub struct Utf8;

/// Marker for utf16 (`u16` units).
#[derive(Debug, Copy, Clone)]
pub struct Utf16;

/// Marker for utf32 (`u32` units).
#[derive(Debug, Copy, Clone)]
pub struct Utf32;

impl UnicodeForm for Utf8 {
    type Unit = u8;
    const ENCODING: Encoding = Encoding::Utf8;

    #[inline]
    fn decode_group(input: &[u8]) -> Decoded {
        utf8::decode_group(input)
    }

    #[inline]
    fn encode(code: u32, out: &mut [u8; 4]) -> Option<usize> {
        utf8::encode(code, out)
    }
}

impl UnicodeForm for Utf16 {
    type Unit = u16;
    const ENCODING: Encoding = Encoding::Utf16;

    #[inline]
    fn decode_group(input: &[u16]) -> Decoded {
        utf16::decode_group(input)
    }

    #[inline]
    fn encode(code: u32, out: &mut [u16; 4]) -> Option<usize> {
        let mut pair = [0u16; 2];
        let len = utf16::encode(code, &mut pair)?;
        out[..len].copy_from_slice(&pair[..len]);
        Some(len)
    }
}

impl UnicodeForm for Utf32 {
    type Unit = u32;
    const ENCODING: Encoding = Encoding::Utf32;

    #[inline]
    fn decode_group(input: &[u32]) -> Decoded {
        utf32::decode_group(input)
    }

    #[inline]
    fn encode(code: u32, out: &mut [u32; 4]) -> Option<usize> {
        if code > crate::MAX_CODE_POINT {
            return None;
        }
        out[0] = code;
        Some(1)
    }
}

/// Converts all of `src` from encoding `S` to encoding `D`, writing the
/// result to `dst`.
///
/// This is the generic form of the named converters such as
/// `utf8_to_utf16()`.  Note that unlike the named identity converters,
/// `convert::<Utf8, Utf8>()` and friends do validate their input.
pub fn convert<S: UnicodeForm, D: UnicodeForm>(
    src: &[S::Unit],
    dst: &mut [D::Unit],
    options: &ConvertOptions,
) -> ConvertResult {
    if dst.is_empty() {
        return Err(ConvertError::InsufficientBuffer {
            input_units_consumed: 0,
            output_units_written: 0,
        });
    }

    // Reserve the last slot for the terminator.
    let limit = dst.len() - 1;
    // A NUL default can't be told apart from the terminator.
    let default_char = options.default_char.filter(|&c| c != '\0');
    let mut input_i = 0;
    let mut output_i = 0;
    let mut buf = [<D::Unit as CodeUnit>::ZERO; 4];

    while input_i < src.len() {
        // Decode, substituting the default character if needed.
        let (code, consumed) = match S::decode_group(&src[input_i..]) {
            Decoded::Scalar { code, len } => (code, len),
            Decoded::Invalid { len } => {
                let error_range = (input_i, input_i + len);
                match default_char {
                    Some(c) => {
                        debug!(?error_range, "substituting default character for invalid input");
                        (c as u32, len)
                    }
                    None => {
                        dst[output_i] = <D::Unit as CodeUnit>::ZERO;
                        return Err(ConvertError::Invalid {
                            error_range,
                            output_units_written: output_i,
                        });
                    }
                }
            }
            Decoded::Truncated => {
                let error_range = (input_i, src.len());
                match (options.truncation, default_char) {
                    (Truncation::Substitute, Some(c)) => {
                        debug!(?error_range, "substituting default character for truncated input");
                        (c as u32, src.len() - input_i)
                    }
                    (Truncation::Substitute, None) => {
                        dst[output_i] = <D::Unit as CodeUnit>::ZERO;
                        return Err(ConvertError::Invalid {
                            error_range,
                            output_units_written: output_i,
                        });
                    }
                    (Truncation::Report, _) => {
                        dst[output_i] = <D::Unit as CodeUnit>::ZERO;
                        return Err(ConvertError::Truncated {
                            error_range,
                            output_units_written: output_i,
                        });
                    }
                }
            }
        };

        // Encode.  Decoded scalars and chars are always encodable, so a
        // failure here means the code point itself is bad.
        let len = match D::encode(code, &mut buf) {
            Some(len) => len,
            None => {
                dst[output_i] = <D::Unit as CodeUnit>::ZERO;
                return Err(ConvertError::Invalid {
                    error_range: (input_i, input_i + consumed),
                    output_units_written: output_i,
                });
            }
        };

        // Write it out, but only if the whole group fits.
        if (output_i + len) > limit {
            dst[output_i] = <D::Unit as CodeUnit>::ZERO;
            return Err(ConvertError::InsufficientBuffer {
                input_units_consumed: input_i,
                output_units_written: output_i,
            });
        }
        dst[output_i..(output_i + len)].copy_from_slice(&buf[..len]);

        // Update our counters.
        input_i += consumed;
        output_i += len;
    }

    dst[output_i] = <D::Unit as CodeUnit>::ZERO;
    Ok(output_i + 1)
}

/// Like `convert()`, but `src` ends at its first zero unit.
pub fn convert_until_nul<S: UnicodeForm, D: UnicodeForm>(
    src: &[S::Unit],
    dst: &mut [D::Unit],
    options: &ConvertOptions,
) -> ConvertResult {
    convert::<S, D>(&src[..nul_len(src)], dst, options)
}

/// Converts all of `src` into a newly allocated `Vec`.
///
/// The returned `Vec` does not include a terminator.  Only fails with
/// `ConvertError::Invalid` or `ConvertError::Truncated`.
pub fn convert_to_vec<S: UnicodeForm, D: UnicodeForm>(
    src: &[S::Unit],
    options: &ConvertOptions,
) -> Result<Vec<D::Unit>, ConvertError> {
    // Every input unit produces at most one code point, so this is always
    // enough room.
    let max_capacity = src
        .len()
        .saturating_mul(D::ENCODING.max_units_per_code_point())
        .saturating_add(1);
    let mut capacity = src.len().saturating_add(1).min(max_capacity);

    loop {
        let mut out = vec![<D::Unit as CodeUnit>::ZERO; capacity];
        match convert::<S, D>(src, &mut out, options) {
            Ok(written) => {
                out.truncate(written - 1);
                return Ok(out);
            }
            Err(ConvertError::InsufficientBuffer { .. }) if capacity < max_capacity => {
                capacity = capacity.saturating_mul(2).min(max_capacity);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Copies `src` to `dst` without any validation.
fn copy_units<U: CodeUnit>(src: &[U], dst: &mut [U]) -> ConvertResult {
    if dst.is_empty() {
        return Err(ConvertError::InsufficientBuffer {
            input_units_consumed: 0,
            output_units_written: 0,
        });
    }

    let len = src.len().min(dst.len() - 1);
    dst[..len].copy_from_slice(&src[..len]);
    dst[len] = U::ZERO;

    if len < src.len() {
        Err(ConvertError::InsufficientBuffer {
            input_units_consumed: len,
            output_units_written: len,
        })
    } else {
        Ok(len + 1)
    }
}

macro_rules! converter {
    ($name:ident, $nul_name:ident, $src:ident => $dst:ident, $from:literal, $to:literal) => {
        #[doc = concat!("Converts ", $from, " to ", $to, ".  See the module docs for details.")]
        pub fn $name(
            src: &[<$src as UnicodeForm>::Unit],
            dst: &mut [<$dst as UnicodeForm>::Unit],
            options: &ConvertOptions,
        ) -> ConvertResult {
            convert::<$src, $dst>(src, dst, options)
        }

        #[doc = concat!("Converts zero-terminated ", $from, " to ", $to, ".")]
        pub fn $nul_name(
            src: &[<$src as UnicodeForm>::Unit],
            dst: &mut [<$dst as UnicodeForm>::Unit],
            options: &ConvertOptions,
        ) -> ConvertResult {
            convert_until_nul::<$src, $dst>(src, dst, options)
        }
    };
}

macro_rules! identity {
    ($name:ident, $nul_name:ident, $unit:ty, $enc:literal) => {
        #[doc = concat!("Copies ", $enc, " as-is, without validating it.")]
        pub fn $name(src: &[$unit], dst: &mut [$unit]) -> ConvertResult {
            copy_units(src, dst)
        }

        #[doc = concat!("Copies zero-terminated ", $enc, " as-is, without validating it.")]
        pub fn $nul_name(src: &[$unit], dst: &mut [$unit]) -> ConvertResult {
            copy_units(&src[..nul_len(src)], dst)
        }
    };
}

converter!(utf8_to_utf16, utf8_to_utf16_until_nul, Utf8 => Utf16, "utf8", "utf16");
converter!(utf8_to_utf32, utf8_to_utf32_until_nul, Utf8 => Utf32, "utf8", "utf32");
converter!(utf16_to_utf8, utf16_to_utf8_until_nul, Utf16 => Utf8, "utf16", "utf8");
converter!(utf16_to_utf32, utf16_to_utf32_until_nul, Utf16 => Utf32, "utf16", "utf32");
converter!(utf32_to_utf8, utf32_to_utf8_until_nul, Utf32 => Utf8, "utf32", "utf8");
converter!(utf32_to_utf16, utf32_to_utf16_until_nul, Utf32 => Utf16, "utf32", "utf16");

identity!(utf8_to_utf8, utf8_to_utf8_until_nul, u8, "utf8");
identity!(utf16_to_utf16, utf16_to_utf16_until_nul, u16, "utf16");
identity!(utf32_to_utf32, utf32_to_utf32_until_nul, u32, "utf32");
