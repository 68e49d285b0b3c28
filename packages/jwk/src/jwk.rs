//! The JSON Web Key record and its conversions
//!
//! Parsing is structural only. A record with missing or unknown values is a
//! valid [`Jwk`] until it is asked to produce a native key, at which point
//! the required fields are checked.

use crate::{
    codec,
    config::{CoordinateWidth, KeyValidation, TranscoderConfig},
    crypto::{EcPrivateKey, EcPublicKey, keygen},
    curve,
    error::{JwkError, JwkResult},
};
use serde::{Deserialize, Serialize};
use std::{fmt, io::Read, path::Path};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

/// Key type for elliptic-curve keys
pub const KTY_EC: &str = "EC";
/// Key type for RSA keys
pub const KTY_RSA: &str = "RSA";
/// Key use: signatures
pub const USE_SIG: &str = "sig";
/// Key use: encryption
pub const USE_ENC: &str = "enc";

/// Flat JSON Web Key.
///
/// `None` fields are omitted on serialization. Parsing also accepts the
/// capitalized member names (`Kid`, `Crv`, ...) written by older producers.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key identifier
    #[serde(default, alias = "Kid", skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Key type, `EC` or `RSA`
    #[serde(default, alias = "Kty", skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Intended use, `sig` or `enc`
    #[serde(
        default,
        rename = "use",
        alias = "Use",
        skip_serializing_if = "Option::is_none"
    )]
    pub key_use: Option<String>,
    /// Algorithm label, e.g. `ES256K`
    #[serde(default, alias = "Alg", skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Curve label (EC only)
    #[serde(default, alias = "Crv", skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// Base64url big-endian x coordinate (EC only)
    #[serde(default, alias = "X", skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// Base64url big-endian y coordinate (EC only)
    #[serde(default, alias = "Y", skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Base64url RSA modulus
    #[serde(default, alias = "N", skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// Base64url RSA public exponent
    #[serde(default, alias = "E", skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Base64url private scalar or exponent, private keys only
    #[serde(default, alias = "D", skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

impl Jwk {
    /// Generate a new signing key for an algorithm label (`ES256`, `ES384`,
    /// `ES512` or `ES256K`) with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::UnknownCurve`] for an unrecognized label and
    /// [`JwkError::EntropyFailure`] if the random source fails.
    pub fn generate(label: &str) -> JwkResult<Self> {
        Self::generate_with(label, &TranscoderConfig::default())
    }

    /// Generate a new signing key using `config` for the output width.
    ///
    /// For the NIST curves `alg` and `crv` both receive the algorithm label.
    /// For secp256k1 `alg` is `ES256K` and `crv` is `P256K`.
    ///
    /// # Errors
    ///
    /// As for [`Jwk::generate`].
    pub fn generate_with(label: &str, config: &TranscoderConfig) -> JwkResult<Self> {
        let curve = curve::resolve(label)?;
        let key = keygen::generate_private_key(curve)?;
        let mut jwk = Self::from_private_key_with(&key, config);
        jwk.kid = Some(keygen::generate_kid()?);
        debug!(kid = ?jwk.kid, %curve, "generated EC key");
        Ok(jwk)
    }

    /// Generate a secp256k1 (`ES256K`) key of the kind used for Ethereum
    /// accounts.
    ///
    /// # Errors
    ///
    /// As for [`Jwk::generate`].
    pub fn generate_ethereum() -> JwkResult<Self> {
        Self::generate(curve::Curve::Secp256k1.algorithm())
    }

    /// Record for a native public key, without `kid`
    #[must_use]
    pub fn from_public_key(key: &EcPublicKey) -> Self {
        Self::from_public_key_with(key, &TranscoderConfig::default())
    }

    /// Record for a native public key using `config` for the output width
    #[must_use]
    pub fn from_public_key_with(key: &EcPublicKey, config: &TranscoderConfig) -> Self {
        let curve = key.curve();
        let mut jwk = Self::default();
        jwk.kty = Some(KTY_EC.to_string());
        jwk.key_use = Some(USE_SIG.to_string());
        jwk.alg = Some(curve.algorithm().to_string());
        jwk.crv = Some(curve.generated_crv().to_string());
        jwk.x = Some(encode_integer(key.x(), config.coordinate_width));
        jwk.y = Some(encode_integer(key.y(), config.coordinate_width));
        jwk
    }

    /// Record for a native private key, without `kid`
    #[must_use]
    pub fn from_private_key(key: &EcPrivateKey) -> Self {
        Self::from_private_key_with(key, &TranscoderConfig::default())
    }

    /// Record for a native private key using `config` for the output width
    #[must_use]
    pub fn from_private_key_with(key: &EcPrivateKey, config: &TranscoderConfig) -> Self {
        let mut jwk = Self::from_public_key_with(key.public_key(), config);
        jwk.d = Some(encode_integer(key.scalar_bytes(), config.coordinate_width));
        jwk
    }

    /// Parse a record from JSON bytes.
    ///
    /// Only the document structure is checked. Unknown members are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::Parse`] if the input is not a JSON object with
    /// string-valued JWK members.
    pub fn from_slice(bytes: &[u8]) -> JwkResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a record from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::Parse`] on malformed input or a failed read.
    pub fn from_reader<R: Read>(reader: R) -> JwkResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a record from a file.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::Io`] if the file cannot be read and
    /// [`JwkError::Parse`] if its contents are not a JWK document.
    pub fn from_file(path: impl AsRef<Path>) -> JwkResult<Self> {
        let bytes = Zeroizing::new(std::fs::read(path.as_ref())?);
        let jwk = Self::from_slice(&bytes)?;
        debug!(path = %path.as_ref().display(), kid = ?jwk.kid, "loaded JWK from file");
        Ok(jwk)
    }

    /// Compact JSON serialization of every present field
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> JwkResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| JwkError::serialization(&e.to_string()))
    }

    /// Indented JSON serialization of every present field
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::Serialization`] if serialization fails.
    pub fn to_json_pretty(&self) -> JwkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| JwkError::serialization(&e.to_string()))
    }

    /// Copy of this record without the private `d` member
    #[must_use]
    pub fn public_jwk(&self) -> Self {
        let mut public = self.clone();
        if let Some(mut d) = public.d.take() {
            d.zeroize();
        }
        public
    }

    /// Replace the key identifier
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Key identifier
    #[inline]
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Key type
    #[inline]
    #[must_use]
    pub fn kty(&self) -> Option<&str> {
        self.kty.as_deref()
    }

    /// Intended key use
    #[inline]
    #[must_use]
    pub fn key_use(&self) -> Option<&str> {
        self.key_use.as_deref()
    }

    /// Algorithm label
    #[inline]
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    /// Curve label
    #[inline]
    #[must_use]
    pub fn crv(&self) -> Option<&str> {
        self.crv.as_deref()
    }

    /// Whether the record carries a non-empty private member
    #[must_use]
    pub fn is_private(&self) -> bool {
        non_empty(&self.d).is_some()
    }

    /// Derive the native public key with the default configuration.
    ///
    /// The point is not checked against the curve equation.
    ///
    /// # Errors
    ///
    /// See [`Jwk::to_public_key_with`].
    pub fn to_public_key(&self) -> JwkResult<EcPublicKey> {
        self.to_public_key_with(&TranscoderConfig::default())
    }

    /// Derive the native public key.
    ///
    /// Requires non-empty `x`, `y` and `crv`. The curve is resolved from
    /// `crv`, never from `alg`.
    ///
    /// # Errors
    ///
    /// - [`JwkError::MissingFields`] naming each absent field
    /// - [`JwkError::MalformedEncoding`] for a coordinate that is not base64url
    /// - [`JwkError::UnknownCurve`] for an unrecognized `crv`
    /// - [`JwkError::InvalidKeyMaterial`] for an oversized coordinate, or an
    ///   off-curve point under [`KeyValidation::Strict`]
    pub fn to_public_key_with(&self, config: &TranscoderConfig) -> JwkResult<EcPublicKey> {
        let (x, y, crv) = self.require_point(false)?;
        let key = self.decode_point(x, y, crv)?;
        if config.validation == KeyValidation::Strict && !key.is_on_curve() {
            warn!(kid = ?self.kid, curve = %key.curve(), "rejected JWK point not on curve");
            return Err(JwkError::invalid_key_material(
                "x/y",
                &format!("point is not on curve {}", key.curve()),
            ));
        }
        debug!(kid = ?self.kid, curve = %key.curve(), "derived EC public key");
        Ok(key)
    }

    /// Derive the native private key with the default configuration.
    ///
    /// Neither the scalar range nor its match with `x`/`y` is checked.
    ///
    /// # Errors
    ///
    /// See [`Jwk::to_private_key_with`].
    pub fn to_private_key(&self) -> JwkResult<EcPrivateKey> {
        self.to_private_key_with(&TranscoderConfig::default())
    }

    /// Derive the native private key.
    ///
    /// Requires non-empty `x`, `y`, `d` and `crv`.
    ///
    /// # Errors
    ///
    /// As for [`Jwk::to_public_key_with`]. Under [`KeyValidation::Strict`]
    /// a scalar that is out of range or does not produce `x`/`y` fails
    /// with [`JwkError::InvalidKeyMaterial`].
    pub fn to_private_key_with(&self, config: &TranscoderConfig) -> JwkResult<EcPrivateKey> {
        let (x, y, crv) = self.require_point(true)?;
        let public = self.decode_point(x, y, crv)?;
        let encoded_d = non_empty(&self.d).unwrap_or_default();
        let d = Zeroizing::new(codec::decode_field("d", encoded_d)?);
        let key = EcPrivateKey::from_parts(public, &d)?;
        if config.validation == KeyValidation::Strict {
            if let Err(err) = key.check_consistency() {
                warn!(kid = ?self.kid, curve = %key.curve(), "rejected inconsistent JWK private key");
                return Err(err);
            }
        }
        debug!(kid = ?self.kid, curve = %key.curve(), "derived EC private key");
        Ok(key)
    }

    /// Return `x`, `y`, `crv`, or the names of every required field that
    /// is absent or empty.
    fn require_point(&self, with_private: bool) -> JwkResult<(&str, &str, &str)> {
        let mut missing = Vec::new();
        let x = non_empty(&self.x);
        let y = non_empty(&self.y);
        let crv = non_empty(&self.crv);
        if x.is_none() {
            missing.push("x");
        }
        if y.is_none() {
            missing.push("y");
        }
        if with_private && !self.is_private() {
            missing.push("d");
        }
        if crv.is_none() {
            missing.push("crv");
        }
        match (x, y, crv) {
            (Some(x), Some(y), Some(crv)) if missing.is_empty() => Ok((x, y, crv)),
            _ => Err(JwkError::missing_fields(missing)),
        }
    }

    fn decode_point(&self, x: &str, y: &str, crv: &str) -> JwkResult<EcPublicKey> {
        let x = codec::decode_field("x", x)?;
        let y = codec::decode_field("y", y)?;
        let curve = curve::resolve(crv)?;
        EcPublicKey::from_coordinates(curve, &x, &y)
    }
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kid", &self.kid)
            .field("kty", &self.kty)
            .field("use", &self.key_use)
            .field("alg", &self.alg)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("n", &self.n)
            .field("e", &self.e)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Drop for Jwk {
    fn drop(&mut self) {
        if let Some(d) = self.d.as_mut() {
            d.zeroize();
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn encode_integer(be_bytes: &[u8], width: CoordinateWidth) -> String {
    match width {
        CoordinateWidth::Minimal => codec::encode_uint(be_bytes),
        CoordinateWidth::Fixed => codec::encode(be_bytes),
    }
}
