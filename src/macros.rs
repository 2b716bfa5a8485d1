//! Macros for fixed keyword arguments and process-wide injectors.

/// Builds a [`Kwargs`](crate::Kwargs) map from `name => value` pairs.
///
/// ```rust
/// use alias_injector::kwargs;
///
/// let fixed = kwargs! { "x" => 1, "y" => "two" };
/// assert_eq!(fixed.len(), 2);
/// assert_eq!(fixed["x"].downcast_ref::<i32>(), Some(&1));
/// ```
#[macro_export]
macro_rules! kwargs {
    () => {
        $crate::Kwargs::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut kwargs = $crate::Kwargs::new();
        $(
            kwargs.insert(
                ::std::string::String::from($name),
                ::std::sync::Arc::new($value) as $crate::Value,
            );
        )+
        kwargs
    }};
}

/// Creates a module holding a process-wide injector.
///
/// The macro generates a module containing:
/// - a lazily created [`Injector`](crate::Injector) (hidden)
/// - `injector()` to reach the instance itself
/// - free functions delegating to it
///
/// # Examples
///
/// ```rust
/// use alias_injector::{define_injector, Args, Callable};
///
/// define_injector!(services);
///
/// services::register(Callable::new(|_: Args| Ok(365u32)), "days").unwrap();
///
/// let handler = services::inject(["days"]).apply(Callable::function(
///     "days_handler",
///     ["days", "year"],
///     |args: Args| {
///         let days = args.callable(0, "days")?.call_cloned::<u32>(Args::new())?;
///         Ok((days, *args.get::<u32>("year")?))
///     },
/// ));
///
/// let out = handler.call_cloned::<(u32, u32)>(Args::new().kwarg("year", 3u32));
/// assert_eq!(out.unwrap(), (365, 3));
/// ```
///
/// # Multiple Injectors
///
/// Each invocation creates an isolated injector:
///
/// ```rust
/// use alias_injector::define_injector;
///
/// define_injector!(database);
/// define_injector!(cache);
///
/// database::register_value("db_connection".to_string(), "conn").unwrap();
/// cache::register_value("redis_connection".to_string(), "conn").unwrap();
///
/// assert!(database::contains("conn"));
/// assert!(cache::contains("conn"));
/// ```
#[macro_export]
macro_rules! define_injector {
    ($name:ident) => {
        pub mod $name {
            use std::sync::LazyLock;

            static INJECTOR: LazyLock<$crate::Injector> = LazyLock::new($crate::Injector::new);

            /// The injector behind this module.
            pub fn injector() -> &'static $crate::Injector {
                &INJECTOR
            }

            /// Register a callable under an alias.
            pub fn register(
                callable: $crate::Callable,
                alias: &str,
            ) -> $crate::Result<()> {
                INJECTOR.register(callable, alias)
            }

            /// Register a callable with fixed keyword arguments.
            pub fn register_partial(
                callable: $crate::Callable,
                alias: &str,
                fixed: $crate::Kwargs,
            ) -> $crate::Result<()> {
                INJECTOR.register_partial(callable, alias, fixed)
            }

            /// Register a shared instance under an alias.
            pub fn register_value<T: Send + Sync + 'static>(
                value: T,
                alias: &str,
            ) -> $crate::Result<()> {
                INJECTOR.register_value(value, alias)
            }

            /// Retrieve a callable by alias.
            pub fn get(alias: &str) -> $crate::Result<$crate::Callable> {
                INJECTOR.get(alias)
            }

            /// Check if an alias is registered.
            pub fn contains(alias: &str) -> bool {
                INJECTOR.contains(alias)
            }

            /// Build a decorator injecting the named aliases.
            pub fn inject<I, S>(aliases: I) -> $crate::Inject
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                INJECTOR.inject(aliases)
            }

            /// Build a decorator injecting every registered alias.
            pub fn inject_all() -> $crate::Inject {
                INJECTOR.inject_all()
            }
        }
    };
}
