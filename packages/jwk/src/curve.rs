//! Curve registry
//!
//! Maps every label a caller may hold for an elliptic curve onto one of the
//! supported parameter sets. Three naming conventions are in circulation:
//!
//! - algorithm labels used for generation (`ES256`, `ES384`, `ES512`, `ES256K`)
//! - the `crv` labels stored in records (`P256`, `P384`, `P521`, `P256K`)
//! - the registered JOSE names (`P-256`, `P-384`, `P-521`, `secp256k1`)
//!
//! All of them resolve through the single table below.

use crate::error::{JwkError, JwkResult};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Supported elliptic curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
    /// secp256k1, the Koblitz curve used by Ethereum keys
    Secp256k1,
}

static CURVE_LABELS: Lazy<HashMap<&'static str, Curve>> = Lazy::new(|| {
    HashMap::from([
        ("ES256", Curve::P256),
        ("ES384", Curve::P384),
        ("ES512", Curve::P521),
        ("ES256K", Curve::Secp256k1),
        ("P256", Curve::P256),
        ("P384", Curve::P384),
        ("P521", Curve::P521),
        ("P256K", Curve::Secp256k1),
        ("P-256", Curve::P256),
        ("P-384", Curve::P384),
        ("P-521", Curve::P521),
        ("secp256k1", Curve::Secp256k1),
    ])
});

/// Resolve a curve or algorithm label to its curve.
///
/// # Errors
///
/// Returns [`JwkError::UnknownCurve`] for any label outside the table.
/// Matching is case-sensitive.
pub fn resolve(label: &str) -> JwkResult<Curve> {
    CURVE_LABELS
        .get(label)
        .copied()
        .ok_or_else(|| JwkError::unknown_curve(label))
}

impl Curve {
    /// Every supported curve
    #[must_use]
    pub const fn all() -> [Curve; 4] {
        [Curve::P256, Curve::P384, Curve::P521, Curve::Secp256k1]
    }

    /// JOSE algorithm label (`alg`)
    #[must_use]
    pub const fn algorithm(self) -> &'static str {
        match self {
            Curve::P256 => "ES256",
            Curve::P384 => "ES384",
            Curve::P521 => "ES512",
            Curve::Secp256k1 => "ES256K",
        }
    }

    /// Curve label in the record `crv` vocabulary
    #[must_use]
    pub const fn crv_label(self) -> &'static str {
        match self {
            Curve::P256 => "P256",
            Curve::P384 => "P384",
            Curve::P521 => "P521",
            Curve::Secp256k1 => "P256K",
        }
    }

    /// Value written to `crv` when a key is generated.
    ///
    /// Standard curves carry their algorithm label here; secp256k1 carries
    /// `P256K` while its `alg` stays `ES256K`.
    #[must_use]
    pub const fn generated_crv(self) -> &'static str {
        match self {
            Curve::Secp256k1 => "P256K",
            other => other.algorithm(),
        }
    }

    /// Byte width of a field element (and of an encoded scalar)
    #[must_use]
    pub const fn field_size(self) -> usize {
        match self {
            Curve::P256 | Curve::Secp256k1 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }

    /// Bit length of the group order
    #[must_use]
    pub const fn order_bits(self) -> usize {
        match self {
            Curve::P256 | Curve::Secp256k1 => 256,
            Curve::P384 => 384,
            Curve::P521 => 521,
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.crv_label())
    }
}

impl FromStr for Curve {
    type Err = JwkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve(s)
    }
}

/// Run a generic function instantiated for the RustCrypto curve type that
/// matches a [`Curve`] value.
macro_rules! dispatch_curve {
    ($curve:expr, $func:ident ( $($arg:expr),* $(,)? )) => {
        match $curve {
            $crate::curve::Curve::P256 => $func::<p256::NistP256>($($arg),*),
            $crate::curve::Curve::P384 => $func::<p384::NistP384>($($arg),*),
            $crate::curve::Curve::P521 => $func::<p521::NistP521>($($arg),*),
            $crate::curve::Curve::Secp256k1 => $func::<k256::Secp256k1>($($arg),*),
        }
    };
}

pub(crate) use dispatch_curve;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_labels_resolve() {
        assert_eq!(resolve("ES256").unwrap(), Curve::P256);
        assert_eq!(resolve("ES384").unwrap(), Curve::P384);
        assert_eq!(resolve("ES512").unwrap(), Curve::P521);
        assert_eq!(resolve("ES256K").unwrap(), Curve::Secp256k1);
    }

    #[test]
    fn crv_and_registered_names_resolve() {
        for curve in Curve::all() {
            assert_eq!(resolve(curve.crv_label()).unwrap(), curve);
            assert_eq!(resolve(curve.algorithm()).unwrap(), curve);
            assert_eq!(resolve(curve.generated_crv()).unwrap(), curve);
        }
        assert_eq!(resolve("P-521").unwrap(), Curve::P521);
        assert_eq!(resolve("secp256k1").unwrap(), Curve::Secp256k1);
    }

    #[test]
    fn unknown_labels_fail() {
        for label in ["", "es256", "ES256k", "RS256", "HS256", "Ed25519", "P-256K"] {
            match resolve(label) {
                Err(JwkError::UnknownCurve(l)) => assert_eq!(l, label),
                other => panic!("expected UnknownCurve for {label:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn widths_match_curve_sizes() {
        for curve in Curve::all() {
            assert!(curve.field_size() * 8 >= curve.order_bits());
            assert!(curve.field_size() * 8 - curve.order_bits() < 8);
        }
        assert_eq!(Curve::P521.field_size(), 66);
    }

    #[test]
    fn from_str_uses_the_registry() {
        let curve: Curve = "P256K".parse().unwrap();
        assert_eq!(curve, Curve::Secp256k1);
        assert!("P255".parse::<Curve>().is_err());
    }
}
