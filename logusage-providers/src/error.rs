//! Decoder errors.

use thiserror::Error;

use crate::decoder::PayloadKind;

/// A payload that could not be decoded into its typed form.
#[derive(Debug, Error)]
#[error("Failed to decode {kind} payload: {cause}")]
pub struct DecodeError {
    /// Which payload shape was expected.
    pub kind: PayloadKind,
    /// Human-readable cause.
    pub cause: String,
}

impl DecodeError {
    /// Creates a decode error.
    pub fn new(kind: PayloadKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Wraps a serde error for the given payload kind.
    pub fn from_json(kind: PayloadKind, err: &serde_json::Error) -> Self {
        Self::new(kind, err.to_string())
    }
}
