/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// Keys are borrowed for the duration of the callback; clone them if you need
/// to keep them.
///
/// # Examples
///
/// ```rust
/// use universals::RegistryEvent;
///
/// let event = RegistryEvent::Set { key: "one" };
/// assert_eq!(event.to_string(), "set { key: one }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent<'a> {
    /// A value was stored under `key`.
    Set { key: &'a str },

    /// A value was requested.
    Get {
        key: &'a str,
        /// Whether the key was present
        found: bool,
    },

    /// A presence check was performed.
    Has { key: &'a str, found: bool },

    /// A deferred value stored under `key` was forced and cached in place.
    Resolve { key: &'a str },

    /// The registry was cleared.
    Clear {},
}

impl std::fmt::Display for RegistryEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Set { key } => write!(f, "set {{ key: {key} }}"),
            RegistryEvent::Get { key, found } => {
                write!(f, "get {{ key: {key}, found: {found} }}")
            }
            RegistryEvent::Has { key, found } => {
                write!(f, "has {{ key: {key}, found: {found} }}")
            }
            RegistryEvent::Resolve { key } => write!(f, "resolve {{ key: {key} }}"),
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
