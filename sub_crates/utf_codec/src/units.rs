//! Code unit types and helpers for zero-terminated unit sequences.

use std::cmp::Ordering;
use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// A fixed-width code unit: `u8` for utf8, `u16` for utf16, and `u32` for
/// utf32.
pub trait CodeUnit: sealed::Sealed + Copy + Eq + Ord + Default + fmt::Debug + 'static {
    /// Width of the unit in bytes.
    const WIDTH: usize;

    /// The zero unit, used as a sequence terminator.
    const ZERO: Self;

    /// Line feed (U+000A) as a unit.
    const LF: Self;

    /// Carriage return (U+000D) as a unit.
    const CR: Self;

    /// Reverses the byte order of the unit.
    fn swap_bytes(self) -> Self;

    /// Builds a unit from exactly `WIDTH` bytes in host byte order.
    ///
    /// Panics if `bytes.len() != WIDTH`.
    fn from_ne_slice(bytes: &[u8]) -> Self;

    /// Appends the unit's bytes, in host byte order, to `out`.
    fn extend_ne_bytes(self, out: &mut Vec<u8>);

    /// Returns whether this is the zero unit.
    #[inline(always)]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_code_unit {
    ($t:ty, $width:expr) => {
        impl CodeUnit for $t {
            const WIDTH: usize = $width;
            const ZERO: Self = 0;
            const LF: Self = 0x0A;
            const CR: Self = 0x0D;

            #[inline(always)]
            fn swap_bytes(self) -> Self {
                <$t>::swap_bytes(self)
            }

            #[inline(always)]
            fn from_ne_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(bytes);
                <$t>::from_ne_bytes(raw)
            }

            #[inline(always)]
            fn extend_ne_bytes(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_code_unit!(u8, 1);
impl_code_unit!(u16, 2);
impl_code_unit!(u32, 4);

/// The byte order code units are stored in, relative to the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ByteOrder {
    /// Same byte order as the host.
    Native,
    /// Opposite byte order to the host.
    Swapped,
}

impl ByteOrder {
    /// The byte order to use for little-endian data on this host.
    pub fn little() -> ByteOrder {
        if cfg!(target_endian = "little") {
            ByteOrder::Native
        } else {
            ByteOrder::Swapped
        }
    }

    /// The byte order to use for big-endian data on this host.
    pub fn big() -> ByteOrder {
        if cfg!(target_endian = "big") {
            ByteOrder::Native
        } else {
            ByteOrder::Swapped
        }
    }

    /// Converts a unit stored in this byte order to host order (and back,
    /// since swapping is its own inverse).
    #[inline(always)]
    pub fn apply<U: CodeUnit>(self, unit: U) -> U {
        match self {
            ByteOrder::Native => unit,
            ByteOrder::Swapped => unit.swap_bytes(),
        }
    }
}

impl Default for ByteOrder {
    fn default() -> ByteOrder {
        ByteOrder::Native
    }
}

/// Describes one of the three Unicode encoding forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16,
    Utf32,
}

impl Encoding {
    /// Width of one code unit of this encoding, in bytes.
    pub fn unit_width(self) -> usize {
        match self {
            Encoding::Utf8 => 1,
            Encoding::Utf16 => 2,
            Encoding::Utf32 => 4,
        }
    }

    /// Maximum number of code units needed to encode one code point.
    pub fn max_units_per_code_point(self) -> usize {
        match self {
            Encoding::Utf8 => 4,
            Encoding::Utf16 => 2,
            Encoding::Utf32 => 1,
        }
    }
}

/// Number of units before the first zero unit.  If there is no zero unit,
/// the whole slice is counted.
pub fn nul_len<U: CodeUnit>(units: &[U]) -> usize {
    units.iter().position(|u| u.is_zero()).unwrap_or(units.len())
}

/// The part of `units` before the first zero unit.
#[inline]
pub fn until_nul<U: CodeUnit>(units: &[U]) -> &[U] {
    &units[..nul_len(units)]
}

/// Compares two zero-terminated sequences unit by unit.
///
/// The end of a slice is treated the same as a zero unit, so the
/// comparison never reads out of bounds.
pub fn compare_until_nul<U: CodeUnit>(a: &[U], b: &[U]) -> Ordering {
    until_nul(a).cmp(until_nul(b))
}

/// Like `compare_until_nul()`, but looks at no more than `n` units.
pub fn compare_until_nul_n<U: CodeUnit>(a: &[U], b: &[U], n: usize) -> Ordering {
    let a = until_nul(a);
    let b = until_nul(b);
    a[..a.len().min(n)].cmp(&b[..b.len().min(n)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_len_01() {
        assert_eq!(nul_len(&[0x41u8, 0x42, 0, 0x43]), 2);
        assert_eq!(nul_len(&[0u16]), 0);
        assert_eq!(nul_len::<u32>(&[]), 0);
        assert_eq!(nul_len(&[1u32, 2, 3]), 3);
    }

    #[test]
    fn compare_01() {
        assert_eq!(compare_until_nul(b"abc\0", b"abc\0"), Ordering::Equal);
        assert_eq!(compare_until_nul(b"abc\0zzz", b"abc"), Ordering::Equal);
        assert_eq!(compare_until_nul(b"ab\0", b"abc\0"), Ordering::Less);
        assert_eq!(compare_until_nul(b"abd", b"abc"), Ordering::Greater);
        assert_eq!(
            compare_until_nul(&[0xD800u16, 0], &[0x0041u16, 0]),
            Ordering::Greater
        );
    }

    #[test]
    fn compare_n_01() {
        assert_eq!(compare_until_nul_n(b"abcd", b"abce", 3), Ordering::Equal);
        assert_eq!(compare_until_nul_n(b"abcd", b"abce", 4), Ordering::Less);
        assert_eq!(compare_until_nul_n(b"ab\0", b"abc", 3), Ordering::Less);
        assert_eq!(compare_until_nul_n(b"x", b"y", 0), Ordering::Equal);
    }

    #[test]
    fn byte_order_01() {
        let lf = ByteOrder::Swapped.apply(<u16 as CodeUnit>::LF);
        assert_eq!(lf, 0x0A00);
        assert_eq!(ByteOrder::Swapped.apply(lf), 0x000A);
        assert_eq!(ByteOrder::Native.apply(0x1234u16), 0x1234);
        assert_eq!(ByteOrder::Swapped.apply(0x0000_000Au32), 0x0A00_0000);
        assert_eq!(ByteOrder::Swapped.apply(0x41u8), 0x41);
    }

    #[test]
    fn byte_order_02() {
        let le = ByteOrder::little();
        let be = ByteOrder::big();
        assert_ne!(le, be);
        let unit = u16::from_ne_slice(&[0x41, 0x00]);
        assert_eq!(le.apply(unit), 0x0041);
        let unit = u16::from_ne_slice(&[0x00, 0x41]);
        assert_eq!(be.apply(unit), 0x0041);
    }

    #[test]
    fn byte_order_03() {
        assert_eq!(ByteOrder::default(), ByteOrder::Native);
    }

    #[test]
    fn encoding_01() {
        assert_eq!(Encoding::Utf8.unit_width(), <u8 as CodeUnit>::WIDTH);
        assert_eq!(Encoding::Utf16.unit_width(), <u16 as CodeUnit>::WIDTH);
        assert_eq!(Encoding::Utf32.unit_width(), <u32 as CodeUnit>::WIDTH);
        assert_eq!(Encoding::Utf8.max_units_per_code_point(), 4);
        assert_eq!(Encoding::Utf16.max_units_per_code_point(), 2);
        assert_eq!(Encoding::Utf32.max_units_per_code_point(), 1);
    }

    #[test]
    fn extend_ne_bytes_01() {
        let mut out = Vec::new();
        0x1234_5678u32.extend_ne_bytes(&mut out);
        assert_eq!(u32::from_ne_slice(&out), 0x1234_5678);
    }
}
