//! # Alias Injector
//!
//! A small dependency injection helper: register callables under string aliases
//! and let the injector supply them to functions whose declared parameters carry
//! the same names.
//!
//! ## Quick Start
//!
//! ```rust
//! use alias_injector::{Args, Callable, Injector};
//!
//! let injector = Injector::new();
//!
//! // Register a callable under an alias
//! injector
//!     .register(
//!         Callable::new(|args: Args| Ok(args.at::<i32>(0)? + args.at::<i32>(1)?)),
//!         "add",
//!     )
//!     .unwrap();
//!
//! // Wrap a function that declares an `add` parameter
//! let f = injector.inject(["add"]).apply(Callable::function(
//!     "f",
//!     ["add", "a", "b"],
//!     |args: Args| {
//!         let add = args.callable(0, "add")?;
//!         add.call_cloned::<i32>(Args::new().arg(*args.get::<i32>("a")?).arg(*args.get::<i32>("b")?))
//!     },
//! ));
//!
//! let sum: i32 = f.call_cloned(Args::new().kwarg("a", 2).kwarg("b", 3)).unwrap();
//! assert_eq!(sum, 5);
//! ```
//!
//! ## Features
//!
//! - **Late binding**: wrappers resolve aliases on every call
//! - **Partial application**: fixed keyword arguments bound at registration
//! - **Caller wins**: arguments passed explicitly are never replaced
//! - **Tracing support**: events go to `tracing` and to an optional callback
//!
//! ## Main Items
//!
//! - [`Injector`] - the alias registry and decorator factory
//! - [`Callable`] - type-erased callable handle with declared parameters
//! - [`Args`] - call arguments
//! - [`define_injector!`] - process-wide injector in its own module
//! - [`kwargs!`] - fixed keyword arguments

mod args;
mod callable;
mod config;
mod inject;
mod injection_error;
mod injector;
mod injector_event;
mod macros;

pub use args::{Args, Kwargs, Value};
pub use callable::Callable;
pub use config::{InjectorConfig, MissingAlias};
pub use inject::Inject;
pub use injection_error::{InjectionError, Result};
pub use injector::{Injector, Lookup, TraceCallback};
pub use injector_event::InjectorEvent;

/// Crate version, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::VERSION;

    #[test]
    fn test_version_is_semver_triple() {
        let parts: Vec<u32> = VERSION
            .split('.')
            .map(|part| part.parse().unwrap())
            .collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(VERSION, "0.1.0");
    }
}
