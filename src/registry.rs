//! The owned registry and the process-wide instance.
//!
//! ```
//! use universals::{instance, RegistryApi};
//!
//! instance().set("greeting", "Hello, World!")?;
//! assert_eq!(instance().get("greeting"), Some("Hello, World!".into()));
//! # Ok::<(), universals::RegistryError>(())
//! ```

use std::fmt;
use std::sync::{LazyLock, Mutex};

use crate::registry_trait::{RegistryApi, Storage, TraceSlot};

/// Global registry, created on first access and never dropped.
static GLOBAL_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// A name-to-value registry with its own storage and trace callback.
///
/// All operations come from [`RegistryApi`]. Construct one per scope that
/// needs isolation, or use [`Registry::instance`] for the shared one.
pub struct Registry {
    storage: Storage,
    trace: TraceSlot,
}

impl Registry {
    /// An empty, independent registry.
    pub fn new() -> Self {
        Self {
            storage: Mutex::default(),
            trace: Mutex::new(None),
        }
    }

    /// The process-wide registry.
    ///
    /// Created exactly once, lazily, on the first call. Every caller gets the
    /// same instance for the rest of the process; `clear` empties it without
    /// replacing it.
    pub fn instance() -> &'static Registry {
        &GLOBAL_REGISTRY
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryApi for Registry {
    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn trace(&self) -> &TraceSlot {
        &self.trace
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

/// The process-wide registry. Same as [`Registry::instance`].
pub fn instance() -> &'static Registry {
    Registry::instance()
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
