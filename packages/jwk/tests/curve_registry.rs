//! Curve label resolution across naming conventions

use cryypt_jwk::{Curve, Jwk, JwkError, resolve};

#[test]
fn generation_labels_resolve_to_their_curves() {
    let expected = [
        ("ES256", Curve::P256),
        ("ES384", Curve::P384),
        ("ES512", Curve::P521),
        ("ES256K", Curve::Secp256k1),
    ];
    for (label, curve) in expected {
        assert_eq!(resolve(label).unwrap(), curve);
        assert_eq!(curve.algorithm(), label);
    }
}

#[test]
fn crv_labels_differ_from_algorithm_labels_for_secp256k1() {
    assert_eq!(Curve::Secp256k1.crv_label(), "P256K");
    assert_eq!(Curve::Secp256k1.algorithm(), "ES256K");
    assert_eq!(resolve("P256K").unwrap(), resolve("ES256K").unwrap());
}

#[test]
fn labels_outside_the_table_are_unknown() {
    for label in ["ES257", "RS256", "p256", "P256k", "secp256r1", " ES256"] {
        assert!(matches!(resolve(label), Err(JwkError::UnknownCurve(_))));
        assert!(matches!(Jwk::generate(label), Err(JwkError::UnknownCurve(_))));
    }
}
