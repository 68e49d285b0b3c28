//! Property tests for the base64url codec

use cryypt_jwk::{JwkError, codec};
use proptest::prelude::*;

proptest! {
    #[test]
    fn decode_inverts_encode(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
        let encoded = codec::encode(&bytes);
        prop_assert!(!encoded.contains('='));
        prop_assert_eq!(codec::decode(&encoded).unwrap(), bytes);
    }

    #[test]
    fn trailing_padding_is_tolerated(bytes in proptest::collection::vec(any::<u8>(), 1..200)) {
        let encoded = codec::encode(&bytes);
        prop_assume!(encoded.len() % 4 != 0);
        let plain = codec::decode(&encoded).unwrap();
        prop_assert_eq!(&codec::decode(&format!("{encoded}=")).unwrap(), &plain);
        prop_assert_eq!(&codec::decode(&format!("{encoded}==")).unwrap(), &plain);
        prop_assert_eq!(plain, bytes);
    }

    #[test]
    fn output_uses_url_safe_alphabet(bytes in proptest::collection::vec(any::<u8>(), 0..100)) {
        let encoded = codec::encode(&bytes);
        prop_assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

#[test]
fn standard_alphabet_characters_are_rejected() {
    for input in ["ab+c", "ab/c", "a b", "abc!"] {
        assert!(matches!(
            codec::decode(input),
            Err(JwkError::MalformedEncoding { .. })
        ));
    }
}

#[test]
fn truncated_groups_are_rejected() {
    assert!(codec::decode("A").is_err());
    assert!(codec::decode("AAAAA").is_err());
    assert!(codec::decode("AAAAA=").is_err());
}

#[test]
fn padding_alone_decodes_to_nothing() {
    assert!(codec::decode("").unwrap().is_empty());
    assert!(codec::decode("==").unwrap().is_empty());
}
