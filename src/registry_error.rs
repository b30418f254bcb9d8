use std::fmt;

use thiserror::Error;

/// Why a key was refused by a write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKeyReason {
    /// The key argument was not text (a number, a bool, a non-string `Value`).
    NotAString,
    /// The key is text but does not match `^[A-Za-z_][A-Za-z_0-9]*[?!]?$`.
    NotAValidName,
}

impl fmt::Display for InvalidKeyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidKeyReason::NotAString => write!(f, "it is not a String"),
            InvalidKeyReason::NotAValidName => write!(f, "it is not a valid property name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("The key '{key}' cannot be used in a registry as {reason}.")]
    InvalidKey {
        key: String,
        reason: InvalidKeyReason,
    },
}

impl RegistryError {
    pub(crate) fn invalid_key(key: impl Into<String>, reason: InvalidKeyReason) -> Self {
        RegistryError::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// The rejected key, rendered as text.
    pub fn key(&self) -> &str {
        match self {
            RegistryError::InvalidKey { key, .. } => key,
        }
    }
}
