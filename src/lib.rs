//! # Universals
//!
//! A process-wide registry of named values, for sharing data across a codebase
//! without threading parameters through every call or scattering globals.
//!
//! Keys are validated property names; values are dynamically typed
//! [`Value`]s, arbitrary [`Shared`] objects, or [`Deferred`] thunks that run on
//! first read and are cached in place.
//!
//! ## Quick Start
//!
//! ```rust
//! use universals::{instance, RegistryApi};
//!
//! let universe = instance();
//!
//! universe.set("one", "Blah")?;
//! universe.set_deferred("expensive", || "computed once".into())?;
//!
//! assert!(universe.has("one"));
//! assert_eq!(universe.get("one"), Some("Blah".into()));
//! assert_eq!(universe.get_or("two", "fallback"), "fallback");
//! assert_eq!(universe.get("expensive"), Some("computed once".into()));
//! # Ok::<(), universals::RegistryError>(())
//! ```
//!
//! ## Features
//!
//! - **Thread-safe**: every operation serializes on the registry's lock
//! - **Validated names**: keys must look like `name`, `_name`, `name?` or `name!`
//! - **Deferred values**: thunks run until one call returns, then the result replaces them
//! - **Any value**: structs and handles are stored behind an `Arc` and read back typed
//! - **Insertion order**: `keys`, `values` and `each` follow first-insertion order
//! - **Tracing support**: an optional callback, plus `tracing` events behind the
//!   default `tracing` feature
//!
//! ## Main Items
//!
//! - [`instance`] - the shared process-wide [`Registry`]
//! - [`Registry::new`] - an isolated registry for injection and tests
//! - [`RegistryApi`] - every registry operation
//! - [`define_registry!`] - a named static registry in its own module
//! - [`define_properties!`] - generated accessor methods for fixed names

mod entry;
mod macros;
mod name;
mod property;
mod registry;
mod registry_error;
mod registry_event;
mod registry_trait;

pub use entry::{Deferred, Entry, Shared};
pub use name::{is_valid_name, validate_name, AsKey};
pub use property::Property;
pub use registry::{instance, Registry};
pub use registry_error::{InvalidKeyReason, RegistryError};
pub use registry_event::RegistryEvent;
pub use registry_trait::{RegistryApi, Storage, TraceCallback, TraceSlot};

pub use serde_json::Value;

#[doc(hidden)]
pub use paste;

/// Crate version as `major.minor.build`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MAJOR_VERSION: &str = env!("CARGO_PKG_VERSION_MAJOR");
pub const MINOR_VERSION: &str = env!("CARGO_PKG_VERSION_MINOR");
pub const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION_PATCH");
