//! Encoding/decoding functions for utf16.
//!
//! Units are always in host byte order here.  See `ByteOrder` for dealing
//! with data stored the other way around.

use crate::convert::Decoded;
use crate::utf8;
use crate::MAX_CODE_POINT;

#[inline(always)]
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

#[inline(always)]
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

#[inline(always)]
fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x10000 + (high as u32 - 0xD800) * 0x400 + (low as u32 - 0xDC00)
}

/// Decodes a one or two unit group to a code point.
///
/// `group[1]` is the unit following `group[0]`, or zero if `group[0]` is
/// the last unit of a zero-terminated string.  A surrogate that is
/// immediately followed by the terminator decodes to its own value, so
/// that a string ending in half of a pair still round-trips.  Any other
/// unpaired surrogate gives `None`.
pub fn to_code_point(group: [u16; 2]) -> Option<u32> {
    let [first, second] = group;
    if is_high_surrogate(first) {
        if is_low_surrogate(second) {
            Some(combine_surrogates(first, second))
        } else if second == 0 {
            Some(first as u32)
        } else {
            None
        }
    } else if is_low_surrogate(first) {
        if second == 0 {
            Some(first as u32)
        } else {
            None
        }
    } else {
        Some(first as u32)
    }
}

/// Encodes `code` into `out`, returning the number of units used.
///
/// A single unit is followed by a zero terminator in `out[1]`.  Returns
/// `None` if `code` is above U+10FFFF.
pub fn encode(code: u32, out: &mut [u16; 2]) -> Option<usize> {
    if code > MAX_CODE_POINT {
        return None;
    }

    if code < 0x10000 {
        *out = [code as u16, 0];
        Some(1)
    } else {
        let code = code - 0x10000;
        *out = [
            0xD800 | (code >> 10) as u16,
            0xDC00 | (code & 0x3FF) as u16,
        ];
        Some(2)
    }
}

/// Transcodes a utf16 group directly to utf8.  See `to_code_point()` for
/// the meaning of `group`.
pub fn to_utf8(group: [u16; 2], out: &mut [u8; 4]) -> Option<usize> {
    to_code_point(group).and_then(|code| utf8::encode(code, out))
}

/// Classifies the group at the start of `input`, which must not be empty.
///
/// Unlike `to_code_point()`, unpaired surrogates are always invalid here,
/// and an invalid group only ever consumes a single unit.
pub(crate) fn decode_group(input: &[u16]) -> Decoded {
    let first = input[0];
    if is_high_surrogate(first) {
        match input.get(1) {
            None => Decoded::Truncated,
            Some(&second) if is_low_surrogate(second) => Decoded::Scalar {
                code: combine_surrogates(first, second),
                len: 2,
            },
            // Error: first half of a pair without its second half.
            Some(_) => Decoded::Invalid { len: 1 },
        }
    } else if is_low_surrogate(first) {
        // Error: orphaned second half of a surrogate pair.
        Decoded::Invalid { len: 1 }
    } else {
        Decoded::Scalar {
            code: first as u32,
            len: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_01() {
        let mut buf = [0xFFFFu16; 2];
        assert_eq!(encode(0x3053, &mut buf), Some(1));
        assert_eq!(buf, [0x3053, 0]);
    }

    #[test]
    fn encode_02() {
        let mut buf = [0u16; 2];
        assert_eq!(encode(0x10000, &mut buf), Some(2));
        assert_eq!(buf, [0xD800, 0xDC00]);
        assert_eq!(encode(0x1F63A, &mut buf), Some(2));
        assert_eq!(buf, [0xD83D, 0xDE3A]);
        assert_eq!(encode(MAX_CODE_POINT, &mut buf), Some(2));
        assert_eq!(buf, [0xDBFF, 0xDFFF]);
    }

    #[test]
    fn encode_error_01() {
        let mut buf = [0u16; 2];
        assert_eq!(encode(0x110000, &mut buf), None);
        assert_eq!(encode(0xFFFF_FFFF, &mut buf), None);
    }

    #[test]
    fn decode_01() {
        assert_eq!(to_code_point([0x0041, 0x0042]), Some(0x41));
        assert_eq!(to_code_point([0xD800, 0xDC00]), Some(0x10000));
        assert_eq!(to_code_point([0xDBFF, 0xDFFF]), Some(MAX_CODE_POINT));
        assert_eq!(to_code_point([0xFFFF, 0]), Some(0xFFFF));
    }

    #[test]
    fn decode_02() {
        // Surrogates right before the terminator decode to themselves.
        assert_eq!(to_code_point([0xD800, 0]), Some(0xD800));
        assert_eq!(to_code_point([0xDC00, 0]), Some(0xDC00));
    }

    #[test]
    fn decode_error_01() {
        assert_eq!(to_code_point([0xD800, 0x0041]), None);
        assert_eq!(to_code_point([0xD800, 0xD800]), None);
        assert_eq!(to_code_point([0xDC00, 0x0041]), None);
        assert_eq!(to_code_point([0xDC00, 0xDC00]), None);
    }

    #[test]
    fn to_utf8_01() {
        let mut buf = [0u8; 4];
        assert_eq!(to_utf8([0xD834, 0xDD0B], &mut buf), Some(4));
        assert_eq!(buf, [0xF0, 0x9D, 0x84, 0x8B]);
        assert_eq!(to_utf8([0x00DF, 0x0000], &mut buf), Some(2));
        assert_eq!(buf, [0xC3, 0x9F, 0, 0]);
        assert_eq!(to_utf8([0xD800, 0x0041], &mut buf), None);
    }

    #[test]
    fn decode_group_01() {
        assert_eq!(
            decode_group(&[0xD83D, 0xDE3A, 0x0041]),
            Decoded::Scalar {
                code: 0x1F63A,
                len: 2
            }
        );
        assert_eq!(
            decode_group(&[0x0000, 0x0041]),
            Decoded::Scalar { code: 0, len: 1 }
        );
    }

    #[test]
    fn decode_group_02() {
        assert_eq!(decode_group(&[0xD83D]), Decoded::Truncated);
        assert_eq!(decode_group(&[0xD83D, 0x0041]), Decoded::Invalid { len: 1 });
        assert_eq!(decode_group(&[0xD83D, 0x0000]), Decoded::Invalid { len: 1 });
        assert_eq!(decode_group(&[0xDE3A, 0x0041]), Decoded::Invalid { len: 1 });
        assert_eq!(decode_group(&[0xDE3A]), Decoded::Invalid { len: 1 });
    }
}
