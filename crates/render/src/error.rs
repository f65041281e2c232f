//! Encoding error model.

use thiserror::Error;

/// Failure while turning a [`crate::Value`] into JSON.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No conversion rule matched the value.
    #[error("object of type {type_name} is not JSON serializable")]
    Unsupported { type_name: String },

    /// A byte string could not be decoded as text.
    #[error("byte string is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A mapping key converted to something JSON cannot use as a key.
    #[error("keys must be str, int, float, bool or null, not {type_name}")]
    UnsupportedKey { type_name: String },

    /// NaN and infinities have no JSON representation.
    #[error("out of range float values are not JSON compliant: {0}")]
    NonFiniteFloat(f64),

    /// A value survived conversion but is still not plain JSON.
    #[error("{type_name} is not JSON-representable")]
    NotJsonRepresentable { type_name: String },

    /// The top-level value of a safe response must be an object.
    #[error("in order to allow non-object values to be serialized set safe to false")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EncodeError {
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::Unsupported { .. } => "unsupported_type",
            EncodeError::InvalidUtf8(_) => "invalid_utf8",
            EncodeError::UnsupportedKey { .. } => "unsupported_key",
            EncodeError::NonFiniteFloat(_) => "non_finite_float",
            EncodeError::NotJsonRepresentable { .. } => "not_json_representable",
            EncodeError::NotAnObject => "not_an_object",
            EncodeError::Json(_) => "json_error",
        }
    }
}
