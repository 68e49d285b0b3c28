//! JWK error types

use thiserror::Error;

/// JWK operation result type
pub type JwkResult<T> = Result<T, JwkError>;

/// Errors produced while generating, parsing or converting JSON Web Keys.
///
/// Messages name the offending field or curve label but never carry
/// private scalar material.
#[derive(Debug, Error)]
pub enum JwkError {
    /// Curve or algorithm label not present in the curve registry
    #[error("invalid curve specified: {0}")]
    UnknownCurve(String),

    /// A conversion needs fields the record does not carry
    #[error("missing fields in the JWK: {}", .fields.join(", "))]
    MissingFields {
        /// Names of every required field that was absent or empty
        fields: Vec<&'static str>,
    },

    /// A field value is not valid base64url
    #[error("malformed base64url in `{field}`: {reason}")]
    MalformedEncoding {
        /// Field the value came from
        field: &'static str,
        /// Decoder diagnostic
        reason: String,
    },

    /// The input document is not a structurally valid JWK
    #[error("failed to parse JWK: {0}")]
    Parse(String),

    /// A record could not be written out
    #[error("failed to serialize JWK: {0}")]
    Serialization(String),

    /// The secure random source failed during key generation
    #[error("entropy source failure: {0}")]
    EntropyFailure(String),

    /// A decoded value does not fit the curve or failed strict validation
    #[error("invalid key material in `{field}`: {reason}")]
    InvalidKeyMaterial {
        /// Field the value came from
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Reading key material from a file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JwkError {
    /// Create an unknown curve error
    #[inline]
    #[must_use]
    pub fn unknown_curve(label: &str) -> Self {
        JwkError::UnknownCurve(label.to_string())
    }

    /// Create a missing fields error
    #[inline]
    #[must_use]
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        JwkError::MissingFields { fields }
    }

    /// Create a malformed encoding error.
    ///
    /// The decoder diagnostic is dropped for the private scalar, since it can
    /// quote a character of the encoded secret.
    #[must_use]
    pub fn malformed_encoding(field: &'static str, reason: &str) -> Self {
        let reason = if field == "d" {
            "invalid private scalar encoding".to_string()
        } else {
            reason.to_string()
        };
        JwkError::MalformedEncoding { field, reason }
    }

    /// Create a parse error
    #[inline]
    #[must_use]
    pub fn parse(msg: &str) -> Self {
        JwkError::Parse(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        JwkError::Serialization(msg.to_string())
    }

    /// Create an entropy failure error
    #[inline]
    #[must_use]
    pub fn entropy_failure(msg: &str) -> Self {
        JwkError::EntropyFailure(msg.to_string())
    }

    /// Create an invalid key material error
    #[inline]
    #[must_use]
    pub fn invalid_key_material(field: &'static str, reason: &str) -> Self {
        JwkError::InvalidKeyMaterial {
            field,
            reason: reason.to_string(),
        }
    }

    /// Whether this error reports absent fields
    #[must_use]
    pub fn is_missing_fields(&self) -> bool {
        matches!(self, JwkError::MissingFields { .. })
    }
}

impl From<serde_json::Error> for JwkError {
    fn from(err: serde_json::Error) -> Self {
        JwkError::Parse(err.to_string())
    }
}
