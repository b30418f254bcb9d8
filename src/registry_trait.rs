//! Core trait defining registry behavior.
//!
//! This module provides the `RegistryApi` trait with default implementations for
//! validated writes, deferred-aware reads, collection views, and tracing.
//!
//! The registry is name-based: each valid name maps to one [`Entry`], kept in
//! insertion order. Setting an existing name replaces its entry in place.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;

use crate::entry::{Deferred, Entry, Shared};
use crate::name::{validate_name, AsKey};
use crate::property::Property;
use crate::{RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`RegistryEvent`] emitted by the registry it is
/// installed on. It must be thread-safe because registries are shared.
pub type TraceCallback = dyn Fn(&RegistryEvent<'_>) + Send + Sync + 'static;

/// The map behind a registry.
pub type Storage = Mutex<IndexMap<String, Entry>>;

/// The slot holding a registry's trace callback.
pub type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Core trait defining registry behavior.
///
/// Provides default implementations for all registry operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented by the implementor.
///
/// # Lock Poisoning Recovery
///
/// Every method recovers a poisoned lock by extracting the inner value, so reads
/// never fail. The map holds no invariant a panic elsewhere could break.
pub trait RegistryApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback slot.
    fn trace(&self) -> &TraceSlot;

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked for `set`, `get`, `has`, deferred resolution and
    /// `clear`. It runs after the registry locks are released, so it may call
    /// back into any registry, including this one.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
        *lock(self.trace()) = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// This does not affect stored values, only the tracing callback.
    fn clear_trace_callback(&self) {
        *lock(self.trace()) = None;
    }

    /// Emit a registry event to the current callback and to `tracing`.
    ///
    /// # Panics
    ///
    /// If the callback itself panics, the panic propagates to the caller.
    fn emit_event(&self, event: &RegistryEvent<'_>) {
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "universals", %event, "registry event");

        let callback = lock(self.trace()).clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Access the storage.
    fn storage(&self) -> &Storage;

    /// `true` if `key` is currently stored. Never forces a deferred value.
    fn has<K: AsKey + ?Sized>(&self, key: &K) -> bool {
        let Ok(name) = key.as_key() else {
            return false;
        };
        let found = lock(self.storage()).contains_key(name);
        self.emit_event(&RegistryEvent::Has { key: name, found });
        found
    }

    /// Alias for [`has`](RegistryApi::has).
    fn contains<K: AsKey + ?Sized>(&self, key: &K) -> bool {
        self.has(key)
    }

    /// Fetch the entry stored under `key`, whatever its kind.
    ///
    /// A deferred entry is forced here and the result replaces it in the map,
    /// unless the entry was overwritten or cleared while the thunk ran. The
    /// thunk runs without the map lock held, and the returned entry is never
    /// `Entry::Deferred`.
    ///
    /// Returns `None` if `key` is absent (or not a string).
    ///
    /// # Panics
    ///
    /// A panic in the thunk propagates. The entry then stays deferred and the
    /// thunk runs again on the next read.
    fn get_entry<K: AsKey + ?Sized>(&self, key: &K) -> Option<Entry> {
        let name = key.as_key().ok()?;
        let entry = lock(self.storage()).get(name).cloned();

        let mut ran = false;
        let entry = match entry {
            Some(Entry::Deferred(deferred)) => {
                let (value, fresh) = deferred.force_tracked();
                let mut map = lock(self.storage());
                if let Some(slot) = map.get_mut(name) {
                    if matches!(slot, Entry::Deferred(d) if d.ptr_eq(&deferred)) {
                        *slot = Entry::Value(value.clone());
                    }
                }
                ran = fresh;
                Some(Entry::Value(value))
            }
            other => other,
        };

        // only the read that actually ran the thunk reports a resolve
        if ran {
            self.emit_event(&RegistryEvent::Resolve { key: name });
        }
        self.emit_event(&RegistryEvent::Get {
            key: name,
            found: entry.is_some(),
        });

        entry
    }

    /// Fetch the value stored under `key`, forcing it if deferred.
    ///
    /// Returns `None` if `key` is absent (or not a string). A key holding a
    /// [`Shared`] object also gives `None`; read those with
    /// [`get_shared`](RegistryApi::get_shared) or
    /// [`get_entry`](RegistryApi::get_entry).
    fn get<K: AsKey + ?Sized>(&self, key: &K) -> Option<Value> {
        match self.get_entry(key)? {
            Entry::Value(value) => Some(value),
            Entry::Shared(_) | Entry::Deferred(_) => None,
        }
    }

    /// Like [`get`](RegistryApi::get), returning `default` when `key` is absent.
    /// The default is not stored.
    fn get_or<K: AsKey + ?Sized>(&self, key: &K, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Get a shared object by key, downcast to `T`.
    ///
    /// Returns `None` if `key` is absent, holds plain data, or holds an object
    /// of another type.
    fn get_shared<T: Send + Sync + 'static, K: AsKey + ?Sized>(&self, key: &K) -> Option<Arc<T>> {
        self.get_entry(key)?.as_shared()?.downcast::<T>()
    }

    /// Store `value` under `key`.
    ///
    /// An existing key keeps its position; a new key is appended.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidKey`] if `key` is not a string or not a valid
    /// name. Nothing is stored in that case.
    fn set<K: AsKey + ?Sized>(&self, key: &K, value: impl Into<Entry>) -> Result<(), RegistryError> {
        let name = key.as_key().and_then(validate_name).inspect_err(|err| {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "universals", error = %err, "rejected registry key");
            #[cfg(not(feature = "tracing"))]
            let _ = err;
        })?;

        lock(self.storage()).insert(name.to_owned(), value.into());
        self.emit_event(&RegistryEvent::Set { key: name });
        Ok(())
    }

    /// Store a thunk under `key` to be run on its first `get`.
    fn set_deferred<K: AsKey + ?Sized>(
        &self,
        key: &K,
        thunk: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        self.set(key, Deferred::new(thunk))
    }

    /// Store an arbitrary object under `key`.
    ///
    /// The value is wrapped in an `Arc`; every reader shares the same instance.
    fn set_shared<K: AsKey + ?Sized, T: Send + Sync + 'static>(
        &self,
        key: &K,
        value: T,
    ) -> Result<(), RegistryError> {
        self.set(key, Shared::new(value))
    }

    /// Store an already `Arc`-wrapped object under `key`.
    ///
    /// Useful when the caller keeps its own handle to the same instance.
    fn set_arc<K: AsKey + ?Sized, T: Send + Sync + 'static>(
        &self,
        key: &K,
        value: Arc<T>,
    ) -> Result<(), RegistryError> {
        self.set(key, Shared::from_arc(value))
    }

    /// Apply [`set`](RegistryApi::set) to every pair, in iteration order.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid key. Pairs before it remain stored.
    fn set_all<I, K, V>(&self, values: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsKey,
        V: Into<Entry>,
    {
        for (key, value) in values {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Iterate over a snapshot of `(name, entry)` pairs in insertion order.
    ///
    /// Entries are yielded as stored: a deferred value that has not been read
    /// through `get` comes out as `Entry::Deferred`.
    fn each(&self) -> std::vec::IntoIter<(String, Entry)> {
        let snapshot: Vec<(String, Entry)> = lock(self.storage())
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();
        snapshot.into_iter()
    }

    /// Number of stored entries.
    fn len(&self) -> usize {
        lock(self.storage()).len()
    }

    /// `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first name, in insertion order, whose stored value equals `value`.
    ///
    /// Deferred entries are compared unresolved and so never match, and
    /// neither do shared objects.
    fn key_for(&self, value: &Value) -> Option<String> {
        lock(self.storage())
            .iter()
            .find(|(_, entry)| *entry == value)
            .map(|(name, _)| name.clone())
    }

    /// Snapshot of all names in insertion order.
    fn keys(&self) -> Vec<String> {
        lock(self.storage()).keys().cloned().collect()
    }

    /// Snapshot of all entries in insertion order, deferred entries unresolved.
    fn values(&self) -> Vec<Entry> {
        lock(self.storage()).values().cloned().collect()
    }

    /// Remove every entry. The registry stays usable.
    ///
    /// This does not affect the tracing callback (use `clear_trace_callback()` for that).
    fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear {});
        lock(self.storage()).clear();
    }

    /// Property-style handle for `name`.
    ///
    /// ```rust
    /// use universals::{Registry, RegistryApi};
    ///
    /// let registry = Registry::new();
    /// registry.property("one").set("Blah")?;
    /// assert_eq!(registry.property("one").get(), Some("Blah".into()));
    /// # Ok::<(), universals::RegistryError>(())
    /// ```
    fn property(&self, name: impl Into<String>) -> Property<'_, Self>
    where
        Self: Sized,
    {
        Property::new(self, name)
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
