//! Macros for declaring named registries and property accessors.

/// Creates a named process-wide registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Trace callback static (hidden)
/// - An `Api` struct that implements `RegistryApi`, and its `API` constant
/// - Free functions delegating to `API`, one for every `RegistryApi` operation
///
/// # Examples
///
/// ```rust
/// use universals::define_registry;
///
/// define_registry!(settings);
///
/// settings::set("theme", "dark")?;
/// assert_eq!(settings::get("theme"), Some("dark".into()));
/// assert_eq!(settings::get_or("font", "mono"), "mono");
/// # Ok::<(), universals::RegistryError>(())
/// ```
///
/// # Multiple Registries
///
/// Each invocation is isolated from every other one:
///
/// ```rust
/// use universals::define_registry;
///
/// define_registry!(database);
/// define_registry!(cache);
///
/// database::set("url", "postgresql://localhost")?;
///
/// assert!(database::has("url"));
/// assert!(!cache::has("url"));
/// # Ok::<(), universals::RegistryError>(())
/// ```
///
/// # Trait-Based Usage
///
/// The `API` constant is a [`RegistryApi`](crate::RegistryApi) value, so it
/// can be passed wherever a registry is expected:
///
/// ```rust
/// use universals::{define_registry, RegistryApi};
///
/// define_registry!(app);
///
/// app::API.property("name").set("demo")?;
/// assert_eq!(app::API.keys(), vec!["name"]);
/// # Ok::<(), universals::RegistryError>(())
/// ```
#[macro_export]
macro_rules! define_registry {
    ($name:ident) => {
        pub mod $name {
            #![allow(dead_code)]

            use std::sync::{Arc, LazyLock, Mutex};

            use $crate::{
                AsKey, Entry, Property, RegistryApi, RegistryError, RegistryEvent, Storage, TraceSlot,
            };

            // Storage for stored values (module-private)
            static STORAGE: LazyLock<Storage> = LazyLock::new(Default::default);

            // Trace callback storage (module-private)
            static TRACE: TraceSlot = Mutex::new(None);

            /// Zero-sized type that implements the registry API.
            ///
            /// All registry operations are provided by the `RegistryApi` trait's
            /// default implementations. This struct only provides access to the statics.
            pub struct Api;

            impl RegistryApi for Api {
                fn storage(&self) -> &Storage {
                    &STORAGE
                }

                fn trace(&self) -> &TraceSlot {
                    &TRACE
                }
            }

            /// Convenient constant for accessing the registry API.
            pub const API: Api = Api;

            /// Check whether `key` is stored.
            pub fn has<K: AsKey + ?Sized>(key: &K) -> bool {
                API.has(key)
            }

            /// Alias for `has`.
            pub fn contains<K: AsKey + ?Sized>(key: &K) -> bool {
                API.contains(key)
            }

            /// Fetch an entry of any kind, forcing it if deferred.
            pub fn get_entry<K: AsKey + ?Sized>(key: &K) -> Option<Entry> {
                API.get_entry(key)
            }

            /// Fetch a value, forcing it if deferred.
            pub fn get<K: AsKey + ?Sized>(key: &K) -> Option<$crate::Value> {
                API.get(key)
            }

            /// Fetch a value or fall back to `default`.
            pub fn get_or<K: AsKey + ?Sized>(key: &K, default: impl Into<$crate::Value>) -> $crate::Value {
                API.get_or(key, default)
            }

            /// Fetch a shared object downcast to `T`.
            pub fn get_shared<T: Send + Sync + 'static, K: AsKey + ?Sized>(key: &K) -> Option<Arc<T>> {
                API.get_shared(key)
            }

            /// Store a value under a validated name.
            pub fn set<K: AsKey + ?Sized>(key: &K, value: impl Into<Entry>) -> Result<(), RegistryError> {
                API.set(key, value)
            }

            /// Store a thunk to be run on first read.
            pub fn set_deferred<K: AsKey + ?Sized>(
                key: &K,
                thunk: impl Fn() -> $crate::Value + Send + Sync + 'static,
            ) -> Result<(), RegistryError> {
                API.set_deferred(key, thunk)
            }

            /// Store an arbitrary object.
            pub fn set_shared<K: AsKey + ?Sized, T: Send + Sync + 'static>(
                key: &K,
                value: T,
            ) -> Result<(), RegistryError> {
                API.set_shared(key, value)
            }

            /// Store an `Arc`-wrapped object, sharing the caller's instance.
            pub fn set_arc<K: AsKey + ?Sized, T: Send + Sync + 'static>(
                key: &K,
                value: Arc<T>,
            ) -> Result<(), RegistryError> {
                API.set_arc(key, value)
            }

            /// Store every pair, stopping at the first invalid name.
            pub fn set_all<I, K, V>(values: I) -> Result<(), RegistryError>
            where
                I: IntoIterator<Item = (K, V)>,
                K: AsKey,
                V: Into<Entry>,
            {
                API.set_all(values)
            }

            /// Snapshot of `(name, entry)` pairs, deferred entries unresolved.
            pub fn each() -> std::vec::IntoIter<(String, Entry)> {
                API.each()
            }

            /// Number of stored entries.
            pub fn len() -> usize {
                API.len()
            }

            /// `true` if nothing is stored.
            pub fn is_empty() -> bool {
                API.is_empty()
            }

            /// First name whose stored value equals `value`.
            pub fn key_for(value: &$crate::Value) -> Option<String> {
                API.key_for(value)
            }

            /// Snapshot of stored names.
            pub fn keys() -> Vec<String> {
                API.keys()
            }

            /// Snapshot of stored entries.
            pub fn values() -> Vec<Entry> {
                API.values()
            }

            /// Property-style handle for `name`.
            pub fn property(name: impl Into<String>) -> Property<'static, Api> {
                Property::new(&API, name)
            }

            /// Remove every entry.
            pub fn clear() {
                API.clear()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&RegistryEvent<'_>) + Send + Sync + 'static) {
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                API.clear_trace_callback()
            }
        }
    };
}

/// Generates named accessor methods for a fixed set of property names.
///
/// For each listed name `foo` the generated trait gets `foo()`, returning the
/// value behind `"foo"`, and `set_foo(value)`, which stores through the same
/// validation as [`RegistryApi::set`](crate::RegistryApi::set). The trait is
/// implemented for every `RegistryApi` type.
///
/// Names that match an existing `RegistryApi` method (`keys`, `set_all`, ...)
/// make calls ambiguous; pick property names that do not.
///
/// ```rust
/// use universals::{define_properties, Registry};
///
/// define_properties! {
///     /// Values shared across the app.
///     pub trait AppProperties {
///         title,
///         retries,
///     }
/// }
///
/// let registry = Registry::new();
/// registry.set_title("Universals")?;
/// assert_eq!(registry.title(), Some("Universals".into()));
/// assert_eq!(registry.retries(), None);
/// # Ok::<(), universals::RegistryError>(())
/// ```
#[macro_export]
macro_rules! define_properties {
    (
        $(#[$meta:meta])*
        $vis:vis trait $trait_name:ident {
            $($prop:ident),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[allow(non_snake_case)]
            $vis trait $trait_name: $crate::RegistryApi {
                $(
                    #[doc = concat!("The value stored under `", stringify!($prop), "`.")]
                    fn $prop(&self) -> Option<$crate::Value> {
                        $crate::RegistryApi::get(self, stringify!($prop))
                    }

                    #[doc = concat!("Store a value under `", stringify!($prop), "`.")]
                    fn [<set_ $prop>](
                        &self,
                        value: impl Into<$crate::Entry>,
                    ) -> Result<(), $crate::RegistryError> {
                        $crate::RegistryApi::set(self, stringify!($prop), value)
                    }
                )*
            }

            impl<R: $crate::RegistryApi> $trait_name for R {}
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Deferred, Registry, RegistryApi, RegistryError};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    define_properties! {
        trait TestProperties {
            One,
            Two,
            _Three,
            computed,
        }
    }

    #[test]
    fn test_define_registry_macro() -> Result<(), RegistryError> {
        define_registry!(test_reg);

        test_reg::set("answer", 42)?;
        assert_eq!(test_reg::get("answer"), Some(json!(42)));

        assert!(test_reg::has("answer"));
        assert!(!test_reg::has("question"));
        assert_eq!(test_reg::len(), 1);

        Ok(())
    }

    #[test]
    fn test_free_functions_cover_the_api() -> Result<(), RegistryError> {
        define_registry!(full_api);

        assert!(full_api::is_empty());
        full_api::property("name").set("demo")?;
        full_api::set("count", 2)?;
        full_api::set_shared("owner", String::from("ops"))?;

        assert!(full_api::contains("name"));
        assert_eq!(full_api::key_for(&json!(2)).as_deref(), Some("count"));
        assert_eq!(full_api::values()[0], json!("demo"));
        assert_eq!(full_api::each().count(), 3);
        assert_eq!(
            full_api::get_shared::<String, _>("owner").as_deref().map(String::as_str),
            Some("ops")
        );
        assert!(full_api::get_entry("owner").unwrap().as_shared().is_some());
        assert_eq!(full_api::property("name").get(), Some(json!("demo")));

        Ok(())
    }

    #[test]
    fn test_multiple_registries() -> Result<(), RegistryError> {
        define_registry!(reg_a);
        define_registry!(reg_b);

        reg_a::set("n", 1)?;
        reg_b::set("n", 2)?;

        assert_eq!(reg_a::get("n"), Some(json!(1)));
        assert_eq!(reg_b::get("n"), Some(json!(2)));

        Ok(())
    }

    #[test]
    fn test_tracing() -> Result<(), RegistryError> {
        define_registry!(trace_test);

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        trace_test::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        trace_test::set("x", 42)?;
        let _ = trace_test::get("x");
        let _ = trace_test::has("x");

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("set"));
        assert!(recorded[1].contains("get"));
        assert!(recorded[2].contains("has"));

        Ok(())
    }

    #[test]
    fn test_generated_accessors() -> Result<(), RegistryError> {
        let registry = Registry::new();

        registry.set_One(1)?;
        registry.set_Two("2")?;
        registry.set__Three(3)?;

        assert_eq!(registry.One(), Some(json!(1)));
        assert_eq!(registry.Two(), Some(json!("2")));
        assert_eq!(registry._Three(), Some(json!(3)));
        assert_eq!(registry.get("_Three"), Some(json!(3)));

        registry.set_Two(3.14)?;
        assert_eq!(registry.Two(), Some(json!(3.14)));

        Ok(())
    }

    #[test]
    fn test_generated_accessors_on_macro_registry() -> Result<(), RegistryError> {
        define_registry!(props);

        props::API.set_computed(Deferred::new(|| json!("Blah-de-blah")))?;
        assert!(props::API.values()[0].is_deferred());
        assert_eq!(props::API.computed(), Some(json!("Blah-de-blah")));

        Ok(())
    }
}
