//! Random EC key generation
//!
//! All randomness comes from the operating system CSPRNG through
//! `getrandom`. A failing source is reported as
//! [`JwkError::EntropyFailure`] and never replaced by a weaker one.

use super::ec_keys::{EcPrivateKey, public_from_secret};
use crate::{
    curve::{Curve, dispatch_curve},
    error::{JwkError, JwkResult},
};
use elliptic_curve::{
    AffinePoint, CurveArithmetic, FieldBytesSize, SecretKey,
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
};
use zeroize::Zeroizing;

/// Upper bound on rejected scalar candidates before giving up.
///
/// With the top byte masked to the order length a candidate is rejected
/// with probability of at most about 2^-32 (P-256) on the supported curves.
const MAX_SCALAR_ATTEMPTS: usize = 64;

/// Generate a fresh private key on `curve`.
///
/// # Errors
///
/// Returns [`JwkError::EntropyFailure`] if the random source fails or keeps
/// producing out-of-range scalars.
pub fn generate_private_key(curve: Curve) -> JwkResult<EcPrivateKey> {
    dispatch_curve!(curve, generate_for(curve))
}

/// Random UUID v4 string for a new key id
pub(crate) fn generate_kid() -> JwkResult<String> {
    let mut bytes = [0u8; 16];
    fill_random(&mut bytes)?;
    Ok(uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string())
}

fn generate_for<C>(curve: Curve) -> JwkResult<EcPrivateKey>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    for attempt in 1..=MAX_SCALAR_ATTEMPTS {
        let candidate = scalar_candidate(curve)?;
        match SecretKey::<C>::from_slice(&candidate) {
            Ok(secret) => {
                let public = public_from_secret(curve, &secret)?;
                let scalar = Zeroizing::new(secret.to_bytes().to_vec());
                return EcPrivateKey::from_parts(public, &scalar);
            }
            Err(_) => tracing::trace!(%curve, attempt, "discarded out-of-range scalar candidate"),
        }
    }
    Err(JwkError::entropy_failure(&format!(
        "no valid {curve} scalar after {MAX_SCALAR_ATTEMPTS} attempts"
    )))
}

/// Field-width random bytes with the bits above the order length cleared
fn scalar_candidate(curve: Curve) -> JwkResult<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(vec![0u8; curve.field_size()]);
    fill_random(bytes.as_mut_slice())?;
    let excess_bits = curve.field_size() * 8 - curve.order_bits();
    bytes[0] &= 0xff >> excess_bits;
    Ok(bytes)
}

fn fill_random(buf: &mut [u8]) -> JwkResult<()> {
    getrandom::fill(buf).map_err(|e| JwkError::entropy_failure(&e.to_string()))
}
