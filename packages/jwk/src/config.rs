//! Transcoder configuration
//!
//! Hosts embed [`TranscoderConfig`] in their own configuration documents;
//! every field has a default so a partial or empty table is accepted.

use serde::{Deserialize, Serialize};

/// How much checking a JWK → native conversion performs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyValidation {
    /// Accept coordinates and scalar as supplied. Points are not checked
    /// against the curve equation and the scalar is not range checked.
    #[default]
    Trusted,
    /// Require the point to lie on the curve, and for private keys require
    /// a scalar in `[1, n)` whose public point matches `x`/`y`.
    Strict,
}

/// Width of integers written into `x`, `y` and `d`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateWidth {
    /// Big-endian with leading zero bytes omitted
    #[default]
    Minimal,
    /// Left-padded to the curve field width (RFC 7518 §6.2.1.2)
    Fixed,
}

/// Options for key generation and conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderConfig {
    /// Checks applied when deriving native keys
    pub validation: KeyValidation,
    /// Integer width used when writing records
    pub coordinate_width: CoordinateWidth,
}

impl TranscoderConfig {
    /// Default configuration: trusted input, minimal integers
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict validation with RFC 7518 fixed-width output
    #[inline]
    #[must_use]
    pub fn strict() -> Self {
        Self {
            validation: KeyValidation::Strict,
            coordinate_width: CoordinateWidth::Fixed,
        }
    }

    /// Set the validation level
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, validation: KeyValidation) -> Self {
        self.validation = validation;
        self
    }

    /// Set the output integer width
    #[inline]
    #[must_use]
    pub fn with_coordinate_width(mut self, width: CoordinateWidth) -> Self {
        self.coordinate_width = width;
        self
    }
}
