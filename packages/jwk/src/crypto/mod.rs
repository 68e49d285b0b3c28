//! Elliptic-curve key material

pub mod ec_keys;
pub mod keygen;

pub use ec_keys::{EcPrivateKey, EcPublicKey, NativePublicKey, NativeSecretKey};
pub use keygen::generate_private_key;
