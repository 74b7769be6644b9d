use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::Config;
use utf_codec::{
    convert_to_vec, utf16_to_utf32, utf16_to_utf8, utf32_to_utf16, utf32_to_utf8, utf8_to_utf16,
    utf8_to_utf32, utf8_to_utf8, ConvertError, ConvertOptions, Utf16, Utf32, Utf8,
};

proptest! {
    #![proptest_config(Config::with_cases(512))]

    #[test]
    fn pt_utf8_utf16_roundtrip(ref text in "\\PC*\\PC*\\PC*") {
        let opts = ConvertOptions::strict();
        let mut utf16 = vec![0u16; text.len() + 1];
        let mut utf8 = vec![0u8; text.len() + 1];

        // Encode to utf16
        let n = utf8_to_utf16(text.as_bytes(), &mut utf16, &opts).unwrap();
        assert_eq!(&utf16[..n - 1], &text.encode_utf16().collect::<Vec<_>>()[..]);

        // Decode back from utf16
        let n = utf16_to_utf8(&utf16[..n - 1], &mut utf8, &opts).unwrap();
        assert_eq!(&utf8[..n - 1], text.as_bytes());
    }

    #[test]
    fn pt_utf8_utf32_roundtrip(ref text in "\\PC*\\PC*\\PC*") {
        let opts = ConvertOptions::strict();
        let mut utf32 = vec![0u32; text.len() + 1];
        let mut utf8 = vec![0u8; text.len() + 1];

        // Encode to utf32
        let n = utf8_to_utf32(text.as_bytes(), &mut utf32, &opts).unwrap();
        assert_eq!(n - 1, text.chars().count());

        // Decode back from utf32
        let n = utf32_to_utf8(&utf32[..n - 1], &mut utf8, &opts).unwrap();
        assert_eq!(&utf8[..n - 1], text.as_bytes());
    }

    #[test]
    fn pt_utf16_utf32_roundtrip(ref text in "\\PC*\\PC*\\PC*") {
        let opts = ConvertOptions::strict();
        let utf16: Vec<u16> = text.encode_utf16().collect();
        let mut utf32 = vec![0u32; utf16.len() + 1];
        let mut back = vec![0u16; utf16.len() + 1];

        let n = utf16_to_utf32(&utf16, &mut utf32, &opts).unwrap();
        let n = utf32_to_utf16(&utf32[..n - 1], &mut back, &opts).unwrap();
        assert_eq!(&back[..n - 1], &utf16[..]);
    }

    #[test]
    fn pt_utf8_identity(ref text in "\\PC*") {
        let mut buf = vec![0u8; text.len() + 1];
        let n = utf8_to_utf8(text.as_bytes(), &mut buf).unwrap();
        assert_eq!(&buf[..n - 1], text.as_bytes());
    }

    // Arbitrary bytes must never make the converter write out of bounds,
    // and the default-character policy must always produce valid output.
    #[test]
    fn pt_utf8_garbage(ref data in vec(0u8..=255, 0..256), cap in 0usize..64) {
        let mut buf = vec![0xFFFFu16; cap];
        match utf8_to_utf16(data, &mut buf, &ConvertOptions::new()) {
            Ok(n) => {
                assert!(n <= cap);
                assert_eq!(buf[n - 1], 0);
                assert!(String::from_utf16(&buf[..n - 1]).is_ok());
            }
            Err(ConvertError::InsufficientBuffer { output_units_written, .. }) => {
                if cap > 0 {
                    assert!(output_units_written < cap);
                    assert_eq!(buf[output_units_written], 0);
                    assert!(String::from_utf16(&buf[..output_units_written]).is_ok());
                }
            }
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    #[test]
    fn pt_utf16_garbage(ref data in vec(any::<u16>(), 0..256)) {
        let out = convert_to_vec::<Utf16, Utf8>(data, &ConvertOptions::new()).unwrap();
        assert!(std::str::from_utf8(&out).is_ok());
    }

    #[test]
    fn pt_utf32_garbage(ref data in vec(any::<u32>(), 0..256)) {
        let out = convert_to_vec::<Utf32, Utf16>(data, &ConvertOptions::new()).unwrap();
        assert!(String::from_utf16(&out).is_ok());
        assert!(out.len() <= data.len() * 2);
    }
}
