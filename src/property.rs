//! Named-attribute access.
//!
//! Rust has no catch-all method dispatch, so property syntax comes in two
//! forms: the [`Property`] proxy returned by [`RegistryApi::property`], and named
//! accessor methods generated by [`define_properties!`](crate::define_properties).

use serde_json::Value;

use crate::entry::{Deferred, Entry};
use crate::{RegistryApi, RegistryError};

/// A handle to one name in a registry.
///
/// Reads go through [`RegistryApi::get`] and writes through
/// [`RegistryApi::set`], so deferred resolution and name validation apply
/// unchanged. The name itself is only checked when written.
///
/// This is the stand-in for `registry[name]` and `registry[name] = value`.
/// `Index` must return a reference, and no reference into the map can outlive
/// the mutex guard, so reads return owned values instead.
///
/// ```rust
/// use universals::{Registry, RegistryApi};
///
/// let registry = Registry::new();
/// let port = registry.property("port");
///
/// port.set(8080)?;
/// assert_eq!(port.get(), Some(8080.into()));
/// # Ok::<(), universals::RegistryError>(())
/// ```
pub struct Property<'r, R: RegistryApi> {
    registry: &'r R,
    name: String,
}

impl<'r, R: RegistryApi> Property<'r, R> {
    /// A handle to `name` in `registry`. Nothing is read or written yet.
    pub fn new(registry: &'r R, name: impl Into<String>) -> Self {
        Self {
            registry,
            name: name.into(),
        }
    }

    /// The name this handle reads and writes.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if the name is stored. Does not force a deferred value.
    pub fn exists(&self) -> bool {
        self.registry.has(self.name.as_str())
    }

    /// The current value; `None` if the name was never set.
    pub fn get(&self) -> Option<Value> {
        self.registry.get(self.name.as_str())
    }

    /// The current value, or `default` if the name was never set.
    pub fn get_or(&self, default: impl Into<Value>) -> Value {
        self.registry.get_or(self.name.as_str(), default)
    }

    /// Assign a value.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidKey`] if the name is not a valid key.
    pub fn set(&self, value: impl Into<Entry>) -> Result<&Self, RegistryError> {
        self.registry.set(self.name.as_str(), value)?;
        Ok(self)
    }

    /// Assign a deferred value.
    pub fn set_deferred(
        &self,
        thunk: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Result<&Self, RegistryError> {
        self.set(Deferred::new(thunk))
    }
}

impl<R: RegistryApi> std::fmt::Debug for Property<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}
