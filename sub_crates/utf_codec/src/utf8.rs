//! Encoding/decoding functions for utf8.
//!
//! Decoding is strict: overlong forms, encoded surrogates, and anything
//! above U+10FFFF are rejected.

use crate::convert::Decoded;
use crate::utf16;
use crate::MAX_CODE_POINT;

/// Number of bytes in the utf8 sequence introduced by `lead`, or 0 if
/// `lead` can't start a sequence.
///
/// 0xC0 and 0xC1 only ever start overlong sequences, and 0xF8 and up are
/// outside of utf8 entirely, so all of those give 0.
#[inline]
pub fn sequence_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

/// Returns whether `byte` is a continuation byte.
#[inline(always)]
pub fn is_trail(byte: u8) -> bool {
    (byte & 0b1100_0000) == 0b1000_0000
}

/// Decodes the sequence at the start of `units` to a code point.
///
/// Only the bytes of the first sequence are looked at; anything after it
/// is ignored.  Returns `None` if the sequence is invalid or if `units`
/// is too short to hold it.
pub fn decode(units: &[u8]) -> Option<u32> {
    let len = sequence_len(*units.first()?);
    if len == 0 || units.len() < len {
        return None;
    }
    let seq = &units[..len];
    if !seq[1..].iter().all(|&b| is_trail(b)) {
        return None;
    }

    let (code, min) = match *seq {
        [a] => (a as u32, 0),
        [a, b] => ((((a & 0x1F) as u32) << 6) | (b & 0x3F) as u32, 0x80),
        [a, b, c] => (
            (((a & 0x0F) as u32) << 12) | (((b & 0x3F) as u32) << 6) | (c & 0x3F) as u32,
            0x800,
        ),
        [a, b, c, d] => (
            (((a & 0x07) as u32) << 18)
                | (((b & 0x3F) as u32) << 12)
                | (((c & 0x3F) as u32) << 6)
                | (d & 0x3F) as u32,
            0x10000,
        ),
        _ => return None,
    };

    // Overlong, encoded surrogate, or out of range.
    if code < min || (0xD800..0xE000).contains(&code) || code > MAX_CODE_POINT {
        return None;
    }
    Some(code)
}

/// Encodes `code` into `out`, returning the number of bytes used.
///
/// Any bytes of `out` past the encoded sequence are zeroed, so a sequence
/// shorter than four bytes is followed by a terminator.  Returns `None`
/// (with `out[0]` zeroed) if `code` is above U+10FFFF.
pub fn encode(code: u32, out: &mut [u8; 4]) -> Option<usize> {
    *out = [0; 4];
    if code > MAX_CODE_POINT {
        return None;
    }

    if code < 0x80 {
        out[0] = code as u8;
        Some(1)
    } else if code < 0x800 {
        out[0] = 0b1100_0000 | (code >> 6) as u8;
        out[1] = 0b1000_0000 | (code & 0x3F) as u8;
        Some(2)
    } else if code < 0x10000 {
        out[0] = 0b1110_0000 | (code >> 12) as u8;
        out[1] = 0b1000_0000 | ((code >> 6) & 0x3F) as u8;
        out[2] = 0b1000_0000 | (code & 0x3F) as u8;
        Some(3)
    } else {
        out[0] = 0b1111_0000 | (code >> 18) as u8;
        out[1] = 0b1000_0000 | ((code >> 12) & 0x3F) as u8;
        out[2] = 0b1000_0000 | ((code >> 6) & 0x3F) as u8;
        out[3] = 0b1000_0000 | (code & 0x3F) as u8;
        Some(4)
    }
}

/// Transcodes the utf8 sequence at the start of `units` directly to utf16.
pub fn to_utf16(units: &[u8], out: &mut [u16; 2]) -> Option<usize> {
    decode(units).and_then(|code| utf16::encode(code, out))
}

/// Classifies the group at the start of `input`, which must not be empty.
pub(crate) fn decode_group(input: &[u8]) -> Decoded {
    let len = sequence_len(input[0]);
    if len == 0 {
        return Decoded::Invalid { len: 1 };
    }

    if input.len() < len {
        // Only call it truncated if what we have so far could still turn
        // into a valid sequence.
        if input[1..].iter().all(|&b| is_trail(b)) {
            return Decoded::Truncated;
        }
        return Decoded::Invalid { len: input.len() };
    }

    match decode(&input[..len]) {
        Some(code) => Decoded::Scalar { code, len },
        None => Decoded::Invalid { len },
    }
}
