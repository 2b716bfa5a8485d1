/// Events emitted by the injector during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`
/// and logged through `tracing` at trace level.
///
/// # Examples
///
/// ```rust
/// use alias_injector::InjectorEvent;
///
/// let event = InjectorEvent::Register { alias: "db".into() };
/// assert_eq!(event.to_string(), "register { alias: db }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectorEvent {
    /// A callable was registered under a new alias.
    Register {
        /// The alias the callable was stored under.
        alias: String,
    },

    /// An alias was assigned directly, bypassing the duplicate check.
    Overwrite {
        alias: String,
        /// Whether an existing entry was replaced.
        replaced: bool,
    },

    /// A callable was requested by alias.
    Get { alias: String, found: bool },

    /// An alias was removed.
    Remove { alias: String, found: bool },

    /// A membership check was performed.
    Contains {
        /// The alias, or the name of the callable when looking up by value.
        item: String,
        found: bool,
    },

    /// A wrapped function was called and dependencies were supplied.
    Inject {
        /// Name of the wrapped function, `<anonymous>` if it has none.
        target: String,
        /// Aliases injected into this call, in resolution order.
        injected: Vec<String>,
    },

    /// The injector was cleared.
    Clear {},
}

impl std::fmt::Display for InjectorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectorEvent::Register { alias } => write!(f, "register {{ alias: {alias} }}"),
            InjectorEvent::Overwrite { alias, replaced } => {
                write!(f, "overwrite {{ alias: {alias}, replaced: {replaced} }}")
            }
            InjectorEvent::Get { alias, found } => {
                write!(f, "get {{ alias: {alias}, found: {found} }}")
            }
            InjectorEvent::Remove { alias, found } => {
                write!(f, "remove {{ alias: {alias}, found: {found} }}")
            }
            InjectorEvent::Contains { item, found } => {
                write!(f, "contains {{ item: {item}, found: {found} }}")
            }
            InjectorEvent::Inject { target, injected } => {
                write!(
                    f,
                    "inject {{ target: {target}, injected: [{}] }}",
                    injected.join(", ")
                )
            }
            InjectorEvent::Clear {} => write!(f, "Clearing the Injector"),
        }
    }
}
