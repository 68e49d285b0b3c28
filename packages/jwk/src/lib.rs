//! JSON Web Key (JWK) generation and conversion
//!
//! This crate provides:
//! - EC key generation on P-256, P-384, P-521 and secp256k1 (`ES256K`)
//! - Flat JWK records with JSON serialization that omits absent members
//! - Public projection of private records
//! - Conversion between records and native public/private key objects
//!
//! ```no_run
//! use cryypt_jwk::Jwk;
//!
//! # fn main() -> cryypt_jwk::JwkResult<()> {
//! let jwk = Jwk::generate("ES256K")?;
//! let json = jwk.public_jwk().to_json()?;
//! let public = Jwk::from_slice(&json)?.to_public_key()?;
//! assert_eq!(&public, jwk.to_private_key()?.public_key());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod curve;
mod error;
mod jwk;

pub use config::{CoordinateWidth, KeyValidation, TranscoderConfig};
pub use crypto::{EcPrivateKey, EcPublicKey, NativePublicKey, NativeSecretKey};
pub use curve::{Curve, resolve};
pub use error::*;
pub use jwk::{Jwk, KTY_EC, KTY_RSA, USE_ENC, USE_SIG};
