//! Native elliptic-curve key objects
//!
//! [`EcPublicKey`] and [`EcPrivateKey`] hold curve-width big-endian integers
//! exactly as decoded from a record. Neither constructor checks the curve
//! equation or the scalar range; `to_validated` produces RustCrypto key types
//! and performs those checks.

use crate::{
    curve::{Curve, dispatch_curve},
    error::{JwkError, JwkResult},
};
use elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytesSize, SecretKey,
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// SEC1 tag for an uncompressed point
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// Affine public point on one of the supported curves
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EcPublicKey {
    curve: Curve,
    x: Vec<u8>,
    y: Vec<u8>,
}

/// On-curve checked public key in the matching RustCrypto type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativePublicKey {
    /// NIST P-256
    P256(p256::PublicKey),
    /// NIST P-384
    P384(p384::PublicKey),
    /// NIST P-521
    P521(p521::PublicKey),
    /// secp256k1
    Secp256k1(k256::PublicKey),
}

/// Range checked secret key in the matching RustCrypto type
#[derive(Debug, Clone)]
pub enum NativeSecretKey {
    /// NIST P-256
    P256(p256::SecretKey),
    /// NIST P-384
    P384(p384::SecretKey),
    /// NIST P-521
    P521(p521::SecretKey),
    /// secp256k1
    Secp256k1(k256::SecretKey),
}

impl EcPublicKey {
    /// Build a point from big-endian coordinates.
    ///
    /// Coordinates shorter than the field width are left-padded. Leading
    /// zero bytes beyond the width are dropped, as integer parsing would.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] when a coordinate's value
    /// does not fit the curve's field width.
    pub fn from_coordinates(curve: Curve, x: &[u8], y: &[u8]) -> JwkResult<Self> {
        Ok(Self {
            curve,
            x: fit_to_width(curve, "x", x)?,
            y: fit_to_width(curve, "y", y)?,
        })
    }

    /// Curve the point belongs to
    #[inline]
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// X coordinate, field width big-endian
    #[inline]
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.x
    }

    /// Y coordinate, field width big-endian
    #[inline]
    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// Uncompressed SEC1 encoding `0x04 || x || y`
    #[must_use]
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.x.len() + self.y.len());
        out.push(SEC1_UNCOMPRESSED);
        out.extend_from_slice(&self.x);
        out.extend_from_slice(&self.y);
        out
    }

    /// Whether the coordinates satisfy the curve equation
    #[must_use]
    pub fn is_on_curve(&self) -> bool {
        self.to_validated().is_ok()
    }

    /// Convert into the RustCrypto public key type for this curve.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] if the point is not on the curve.
    pub fn to_validated(&self) -> JwkResult<NativePublicKey> {
        let sec1 = self.to_sec1_bytes();
        let native = match self.curve {
            Curve::P256 => p256::PublicKey::from_sec1_bytes(&sec1).map(NativePublicKey::P256),
            Curve::P384 => p384::PublicKey::from_sec1_bytes(&sec1).map(NativePublicKey::P384),
            Curve::P521 => p521::PublicKey::from_sec1_bytes(&sec1).map(NativePublicKey::P521),
            Curve::Secp256k1 => {
                k256::PublicKey::from_sec1_bytes(&sec1).map(NativePublicKey::Secp256k1)
            }
        };
        native.map_err(|_| {
            JwkError::invalid_key_material(
                "x/y",
                &format!("point is not on curve {}", self.curve),
            )
        })
    }
}

impl fmt::Debug for EcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPublicKey")
            .field("curve", &self.curve)
            .field("x", &hex::encode(&self.x))
            .field("y", &hex::encode(&self.y))
            .finish()
    }
}

/// Private scalar together with its public point
#[derive(Clone)]
pub struct EcPrivateKey {
    public: EcPublicKey,
    d: Zeroizing<Vec<u8>>,
}

impl EcPrivateKey {
    /// Pair a public point with a big-endian private scalar.
    ///
    /// The scalar is not checked against the curve order and is not
    /// required to match the point; see [`EcPrivateKey::to_validated`].
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] when the scalar does not fit
    /// the curve's scalar width.
    pub fn from_parts(public: EcPublicKey, d: &[u8]) -> JwkResult<Self> {
        let d = Zeroizing::new(fit_to_width(public.curve, "d", d)?);
        Ok(Self { public, d })
    }

    /// Curve the key belongs to
    #[inline]
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.public.curve
    }

    /// Public point carried alongside the scalar
    #[inline]
    #[must_use]
    pub fn public_key(&self) -> &EcPublicKey {
        &self.public
    }

    /// Private scalar, curve width big-endian
    #[inline]
    #[must_use]
    pub fn scalar_bytes(&self) -> &[u8] {
        &self.d
    }

    /// Recompute `d·G` from the scalar.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] if the scalar is zero or not
    /// below the curve order.
    pub fn derive_public_key(&self) -> JwkResult<EcPublicKey> {
        dispatch_curve!(self.curve(), derive_point(self.curve(), &self.d))
    }

    /// Check that the scalar is in range and that its public point is the
    /// one carried by this key.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] on either failure.
    pub fn check_consistency(&self) -> JwkResult<()> {
        if self.derive_public_key()? == self.public {
            Ok(())
        } else {
            Err(JwkError::invalid_key_material(
                "d",
                "scalar does not correspond to the public point",
            ))
        }
    }

    /// Convert into the RustCrypto secret key type for this curve, after
    /// [`EcPrivateKey::check_consistency`].
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeyMaterial`] if the key is inconsistent.
    pub fn to_validated(&self) -> JwkResult<NativeSecretKey> {
        self.check_consistency()?;
        let out_of_range =
            |_| JwkError::invalid_key_material("d", "scalar is zero or not below the curve order");
        Ok(match self.curve() {
            Curve::P256 => {
                NativeSecretKey::P256(p256::SecretKey::from_slice(&self.d).map_err(out_of_range)?)
            }
            Curve::P384 => {
                NativeSecretKey::P384(p384::SecretKey::from_slice(&self.d).map_err(out_of_range)?)
            }
            Curve::P521 => {
                NativeSecretKey::P521(p521::SecretKey::from_slice(&self.d).map_err(out_of_range)?)
            }
            Curve::Secp256k1 => NativeSecretKey::Secp256k1(
                k256::SecretKey::from_slice(&self.d).map_err(out_of_range)?,
            ),
        })
    }
}

impl PartialEq for EcPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public && bool::from(self.d.as_slice().ct_eq(other.d.as_slice()))
    }
}

impl Eq for EcPrivateKey {}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("public", &self.public)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl NativePublicKey {
    /// Curve of the wrapped key
    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            NativePublicKey::P256(_) => Curve::P256,
            NativePublicKey::P384(_) => Curve::P384,
            NativePublicKey::P521(_) => Curve::P521,
            NativePublicKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }
}

impl NativeSecretKey {
    /// Curve of the wrapped key
    #[must_use]
    pub fn curve(&self) -> Curve {
        match self {
            NativeSecretKey::P256(_) => Curve::P256,
            NativeSecretKey::P384(_) => Curve::P384,
            NativeSecretKey::P521(_) => Curve::P521,
            NativeSecretKey::Secp256k1(_) => Curve::Secp256k1,
        }
    }
}

/// Normalize a big-endian integer to exactly the curve's field width
fn fit_to_width(curve: Curve, field: &'static str, bytes: &[u8]) -> JwkResult<Vec<u8>> {
    let width = curve.field_size();
    let significant = &bytes[bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len())..];
    if significant.len() > width {
        return Err(JwkError::invalid_key_material(
            field,
            &format!(
                "value is {} bytes, wider than the {width}-byte field of {curve}",
                significant.len()
            ),
        ));
    }
    let mut out = vec![0u8; width];
    out[width - significant.len()..].copy_from_slice(significant);
    Ok(out)
}

fn derive_point<C>(curve: Curve, d: &[u8]) -> JwkResult<EcPublicKey>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let secret = SecretKey::<C>::from_slice(d).map_err(|_| {
        JwkError::invalid_key_material("d", "scalar is zero or not below the curve order")
    })?;
    public_from_secret(curve, &secret)
}

/// Uncompressed public point of a RustCrypto secret key
pub(crate) fn public_from_secret<C>(curve: Curve, secret: &SecretKey<C>) -> JwkResult<EcPublicKey>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let point = secret.public_key().to_encoded_point(false);
    match (point.x(), point.y()) {
        (Some(x), Some(y)) => EcPublicKey::from_coordinates(curve, x.as_slice(), y.as_slice()),
        _ => Err(JwkError::invalid_key_material(
            "d",
            "scalar maps to the identity point",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 6979 A.2.5 P-256 test key
    const P256_D: [u8; 32] =
        hex!("C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721");
    const P256_X: [u8; 32] =
        hex!("60FED4BA255A9D31C961EB74C6356D68C049B8923B61FA6CE669622E60F29FB6");
    const P256_Y: [u8; 32] =
        hex!("7903FE1008B8BC99A41AE9E95628BC64F2F1B20C2D7E9F5177A3C294D4462299");

    #[test]
    fn derives_known_p256_point() {
        let public = EcPublicKey::from_coordinates(Curve::P256, &P256_X, &P256_Y).unwrap();
        let key = EcPrivateKey::from_parts(public.clone(), &P256_D).unwrap();
        assert_eq!(key.derive_public_key().unwrap(), public);
        assert!(key.check_consistency().is_ok());
        assert!(matches!(key.to_validated().unwrap(), NativeSecretKey::P256(_)));
        assert_eq!(public.to_validated().unwrap().curve(), Curve::P256);
    }

    #[test]
    fn secp256k1_generator_from_scalar_one() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let gx = hex!("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");
        let gy = hex!("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");
        let public = EcPublicKey::from_coordinates(Curve::Secp256k1, &gx, &gy).unwrap();
        let key = EcPrivateKey::from_parts(public.clone(), &one).unwrap();
        assert_eq!(key.derive_public_key().unwrap(), public);
        assert!(public.is_on_curve());
    }

    #[test]
    fn short_coordinates_are_left_padded() {
        let key = EcPublicKey::from_coordinates(Curve::P384, &[1, 2], &[3]).unwrap();
        assert_eq!(key.x().len(), 48);
        assert_eq!(&key.x()[46..], &[1, 2]);
        assert_eq!(key.y()[47], 3);
        assert_eq!(key.to_sec1_bytes().len(), 97);
    }

    #[test]
    fn redundant_leading_zeros_are_accepted() {
        let mut wide = vec![0u8; 4];
        wide.extend_from_slice(&P256_X);
        let key = EcPublicKey::from_coordinates(Curve::P256, &wide, &P256_Y).unwrap();
        assert_eq!(key.x(), &P256_X);
    }

    #[test]
    fn oversized_coordinates_are_rejected() {
        let wide = [0xffu8; 33];
        match EcPublicKey::from_coordinates(Curve::P256, &wide, &P256_Y) {
            Err(JwkError::InvalidKeyMaterial { field, .. }) => assert_eq!(field, "x"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn off_curve_points_are_kept_but_fail_validation() {
        let key = EcPublicKey::from_coordinates(Curve::P256, &[1], &[2]).unwrap();
        assert!(!key.is_on_curve());
        assert!(matches!(
            key.to_validated(),
            Err(JwkError::InvalidKeyMaterial { .. })
        ));
    }

    #[test]
    fn zero_scalar_cannot_derive_a_point() {
        let public = EcPublicKey::from_coordinates(Curve::P256, &P256_X, &P256_Y).unwrap();
        let key = EcPrivateKey::from_parts(public, &[0]).unwrap();
        assert!(key.derive_public_key().is_err());
        assert!(key.to_validated().is_err());
    }

    #[test]
    fn mismatched_scalar_fails_consistency() {
        let public = EcPublicKey::from_coordinates(Curve::P256, &P256_X, &P256_Y).unwrap();
        let key = EcPrivateKey::from_parts(public, &[5]).unwrap();
        assert!(key.check_consistency().is_err());
    }

    #[test]
    fn debug_output_redacts_scalar() {
        let public = EcPublicKey::from_coordinates(Curve::P256, &P256_X, &P256_Y).unwrap();
        let key = EcPrivateKey::from_parts(public, &P256_D).unwrap();
        let text = format!("{key:?}");
        assert!(text.contains("<redacted>"));
        assert!(!text.to_lowercase().contains(&hex::encode(P256_D)));
    }
}
