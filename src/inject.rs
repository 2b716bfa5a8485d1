//! The `inject` decorator.
//!
//! A wrapper built by [`Inject::apply`] resolves dependencies on every call,
//! never at decoration time, so entries registered after the wrapper was built
//! are still picked up.

use std::sync::Arc;

use crate::{Args, Callable, InjectionError, Injector, InjectorEvent};

/// Decorator returned by [`Injector::inject`] and [`Injector::inject_all`].
///
/// # Examples
///
/// ```rust
/// use alias_injector::{Args, Callable, Injector};
///
/// let injector = Injector::new();
/// let handler = injector.inject(["add"]).apply(Callable::function(
///     "f",
///     ["add", "a", "b"],
///     |args: Args| {
///         let add = args.callable(0, "add")?;
///         let a = *args.get::<i32>("a")?;
///         let b = *args.get::<i32>("b")?;
///         add.call_cloned::<i32>(Args::new().arg(a).arg(b))
///     },
/// ));
///
/// // registered after decoration, still injected
/// injector
///     .register(
///         Callable::new(|args: Args| Ok(args.at::<i32>(0)? + args.at::<i32>(1)?)),
///         "add",
///     )
///     .unwrap();
///
/// let sum = handler.call_cloned::<i32>(Args::new().kwarg("a", 2).kwarg("b", 3));
/// assert_eq!(sum.unwrap(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct Inject {
    injector: Injector,
    aliases: Vec<String>,
}

impl Inject {
    pub(crate) fn new(injector: Injector, aliases: Vec<String>) -> Self {
        Inject { injector, aliases }
    }

    /// Aliases requested at decoration time; empty in wildcard mode.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Wraps `target`, keeping its name, doc and declared parameters.
    ///
    /// The wrapper does not own the injector. Calling it after every
    /// `Injector` handle is gone fails with `InjectorDropped`.
    pub fn apply(self, target: Callable) -> Callable {
        let Inject { injector, aliases } = self;
        let injector = injector.downgrade();
        let wrapped = target.clone();

        let func = move |mut args: Args| {
            let injector = injector.upgrade().ok_or(InjectionError::InjectorDropped)?;
            let resolved = injector.resolve(&aliases, &wrapped, &args)?;

            let mut injected = Vec::with_capacity(resolved.len());
            for (alias, callable) in resolved {
                args.insert_value(alias.clone(), Arc::new(callable));
                injected.push(alias);
            }

            injector.emit_event(InjectorEvent::Inject {
                target: wrapped.display_name().to_owned(),
                injected,
            });

            wrapped.call(args)
        };

        Callable::from_raw(Arc::new(func)).with_metadata_of(&target)
    }
}
