//! Stored values.
//!
//! An [`Entry`] is plain data, a [`Shared`] object, or a [`Deferred`] thunk.
//! The registry forces a deferred entry on the first `get` of its key and
//! replaces it with the plain result; every other read path sees entries
//! exactly as stored.

use std::any::{self, Any};
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

type Thunk = Box<dyn Fn() -> Value + Send + Sync + 'static>;

struct DeferredInner {
    value: OnceLock<Value>,
    thunk: Thunk,
}

/// A value computed on first use.
///
/// Clones share the same thunk and the same result: once the closure has
/// returned, it is never called again no matter how many clones are forced,
/// or from how many threads.
///
/// If the closure panics the panic propagates to the caller of [`force`] and
/// nothing is cached. The next force calls the closure again.
///
/// [`force`]: Deferred::force
#[derive(Clone)]
pub struct Deferred {
    inner: Arc<DeferredInner>,
}

impl Deferred {
    /// Wrap `thunk` without running it.
    pub fn new(thunk: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(DeferredInner {
                value: OnceLock::new(),
                thunk: Box::new(thunk),
            }),
        }
    }

    /// Run the thunk if it has not produced a value yet and return the result.
    ///
    /// Concurrent callers block until the first one finishes. Forcing a
    /// `Deferred` from inside its own thunk deadlocks.
    pub fn force(&self) -> Value {
        self.force_tracked().0
    }

    /// Like [`force`](Deferred::force), also reporting whether this call ran
    /// the thunk.
    pub(crate) fn force_tracked(&self) -> (Value, bool) {
        let mut ran = false;
        let value = self.inner.value.get_or_init(|| {
            ran = true;
            (self.inner.thunk)()
        });
        (value.clone(), ran)
    }

    /// `true` once the thunk has produced a value.
    pub fn is_resolved(&self) -> bool {
        self.inner.value.get().is_some()
    }

    /// Whether `self` and `other` are handles to the same thunk.
    pub fn ptr_eq(&self, other: &Deferred) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.value.get() {
            Some(value) => f.debug_tuple("Deferred").field(value).finish(),
            None => f.write_str("Deferred(<pending>)"),
        }
    }
}

/// Deferred values compare by identity.
impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// An arbitrary Rust value stored behind an `Arc`.
///
/// Use this for things that are not data: handles, clients, configuration
/// structs. Read it back with [`RegistryApi::get_shared`], which downcasts to
/// the concrete type.
///
/// ```rust
/// use std::sync::Arc;
/// use universals::{Registry, RegistryApi};
///
/// struct Pool {
///     size: usize,
/// }
///
/// let registry = Registry::new();
/// registry.set_shared("pool", Pool { size: 8 })?;
///
/// let pool: Arc<Pool> = registry.get_shared("pool").unwrap();
/// assert_eq!(pool.size, 8);
/// # Ok::<(), universals::RegistryError>(())
/// ```
///
/// [`RegistryApi::get_shared`]: crate::RegistryApi::get_shared
#[derive(Clone)]
pub struct Shared {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Shared {
    /// Move `value` into a new shared allocation.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Share an existing `Arc` without copying what it points to.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: any::type_name::<T>(),
        }
    }

    /// The stored object as a `T`, or `None` if it has another type.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    /// Name of the concrete type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether `self` and `other` point to the same object.
    pub fn ptr_eq(&self, other: &Shared) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared(<{}>)", self.type_name)
    }
}

/// Shared objects compare by identity.
impl PartialEq for Shared {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// What the registry stores under a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Plain data, compared structurally.
    Value(Value),
    /// An arbitrary object, compared by identity.
    Shared(Shared),
    /// A thunk not yet read through `get`, compared by identity.
    Deferred(Deferred),
}

impl Entry {
    /// The plain value, or `None` for a shared or still-deferred entry.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Shared(_) | Entry::Deferred(_) => None,
        }
    }

    pub fn as_shared(&self) -> Option<&Shared> {
        match self {
            Entry::Shared(shared) => Some(shared),
            Entry::Value(_) | Entry::Deferred(_) => None,
        }
    }

    /// `true` for a thunk that has not been replaced by its result.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Entry::Deferred(_))
    }

    /// Resolve to a plain value, forcing a deferred thunk. A shared object
    /// has no plain value and gives `None`.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Shared(_) => None,
            Entry::Deferred(deferred) => Some(deferred.force()),
        }
    }
}

impl PartialEq<Value> for Entry {
    fn eq(&self, other: &Value) -> bool {
        self.as_value() == Some(other)
    }
}

impl From<Deferred> for Entry {
    fn from(deferred: Deferred) -> Self {
        Entry::Deferred(deferred)
    }
}

impl From<Shared> for Entry {
    fn from(shared: Shared) -> Self {
        Entry::Shared(shared)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

macro_rules! entry_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Entry {
                fn from(value: $ty) -> Self {
                    Entry::Value(Value::from(value))
                }
            }
        )*
    };
}

entry_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    &str,
    String,
    Vec<Value>,
    Map<String, Value>,
);
