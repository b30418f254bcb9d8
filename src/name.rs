//! Key validation.
//!
//! Registry keys double as property names, so they follow identifier rules:
//! a letter or underscore, then letters, digits or underscores, with an
//! optional trailing `?` or `!`. Matching is case-sensitive and nothing is
//! trimmed.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::registry_error::{InvalidKeyReason, RegistryError};

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*[?!]?$").expect("name pattern compiles"));

/// Returns `true` if `name` may be used as a registry key.
///
/// ```rust
/// use universals::is_valid_name;
///
/// assert!(is_valid_name("_Three"));
/// assert!(is_valid_name("ready?"));
/// assert!(!is_valid_name("method="));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Checks `name` against the key pattern.
pub fn validate_name(name: &str) -> Result<&str, RegistryError> {
    if is_valid_name(name) {
        Ok(name)
    } else {
        Err(RegistryError::invalid_key(
            name,
            InvalidKeyReason::NotAValidName,
        ))
    }
}

/// Anything that can be handed to the registry as a key.
///
/// Text types yield their contents. Other types stand for a caller passing a
/// non-string key and always yield [`InvalidKeyReason::NotAString`]; reads
/// treat such keys as absent, writes reject them.
pub trait AsKey {
    /// Borrow the key text, or explain why there is none.
    fn as_key(&self) -> Result<&str, RegistryError>;
}

impl AsKey for str {
    fn as_key(&self) -> Result<&str, RegistryError> {
        Ok(self)
    }
}

impl AsKey for String {
    fn as_key(&self) -> Result<&str, RegistryError> {
        Ok(self.as_str())
    }
}

impl AsKey for Value {
    fn as_key(&self) -> Result<&str, RegistryError> {
        match self {
            Value::String(s) => Ok(s.as_str()),
            other => Err(RegistryError::invalid_key(
                other.to_string(),
                InvalidKeyReason::NotAString,
            )),
        }
    }
}

impl<T: AsKey + ?Sized> AsKey for &T {
    fn as_key(&self) -> Result<&str, RegistryError> {
        (**self).as_key()
    }
}

macro_rules! non_string_key {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsKey for $ty {
                fn as_key(&self) -> Result<&str, RegistryError> {
                    Err(RegistryError::invalid_key(
                        self.to_string(),
                        InvalidKeyReason::NotAString,
                    ))
                }
            }
        )*
    };
}

non_string_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);
