//! Validation functions for utf32.
//!
//! Every code point is a single unit, so there's nothing to transcode
//! beyond checking that the unit is a Unicode scalar value.

use crate::convert::Decoded;
use crate::MAX_CODE_POINT;

/// Returns whether `unit` is a valid Unicode scalar value, i.e. not a
/// surrogate and not above U+10FFFF.
#[inline(always)]
pub fn is_scalar(unit: u32) -> bool {
    unit <= MAX_CODE_POINT && !(0xD800..0xE000).contains(&unit)
}

pub(crate) fn decode_group(input: &[u32]) -> Decoded {
    let code = input[0];
    if is_scalar(code) {
        Decoded::Scalar { code, len: 1 }
    } else {
        Decoded::Invalid { len: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_scalar_01() {
        assert!(is_scalar(0));
        assert!(is_scalar(0xD7FF));
        assert!(!is_scalar(0xD800));
        assert!(!is_scalar(0xDFFF));
        assert!(is_scalar(0xE000));
        assert!(is_scalar(MAX_CODE_POINT));
        assert!(!is_scalar(MAX_CODE_POINT + 1));
        assert!(!is_scalar(u32::MAX));
    }

    #[test]
    fn decode_group_01() {
        assert_eq!(
            decode_group(&[0x1F63A, 0xD800]),
            Decoded::Scalar {
                code: 0x1F63A,
                len: 1
            }
        );
        assert_eq!(decode_group(&[0xD800, 0x41]), Decoded::Invalid { len: 1 });
        assert_eq!(decode_group(&[0x110000]), Decoded::Invalid { len: 1 });
    }
}
