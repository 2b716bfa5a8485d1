//! The alias registry and its mapping-style API.
//!
//! An [`Injector`] maps string aliases to [`Callable`]s. Handles are cheap to
//! clone and every clone shares the same map, so an `inject` wrapper built from
//! one handle sees registrations made later through any other.
//!
//! # Examples
//!
//! ```
//! use alias_injector::{kwargs, Args, Callable, Injector};
//!
//! let injector = Injector::new();
//!
//! let sum = Callable::function("sum", ["x", "y", "z"], |args: Args| {
//!     let x = args.param::<i32>(0, "x")?;
//!     let y = args.param::<i32>(1, "y")?;
//!     let z = args.param::<i32>(2, "z")?;
//!     Ok(x + y + z)
//! });
//! injector
//!     .register_partial(sum, "op", kwargs! { "x" => 1, "y" => 1, "z" => 3 })
//!     .unwrap();
//!
//! let op = injector.get("op").unwrap();
//! assert_eq!(op.call_cloned::<i32>(Args::new()).unwrap(), 5);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::{
    Args, Callable, Inject, InjectionError, InjectorConfig, InjectorEvent, Kwargs, MissingAlias,
    Result,
};

type Entries = IndexMap<String, Callable>;

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every `InjectorEvent`. It is invoked with no injector
/// lock held, so it may call back into the same injector.
pub type TraceCallback = dyn Fn(&InjectorEvent) + Send + Sync + 'static;

#[derive(Default)]
struct Inner {
    entries: Mutex<Entries>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
    config: InjectorConfig,
}

/// Alias registry with decorator-style registration and injection.
#[derive(Clone, Default)]
pub struct Injector {
    inner: Arc<Inner>,
}

/// Non-owning handle kept by `inject` wrappers.
///
/// A wrapper registered back into its own injector must not keep that
/// injector alive.
#[derive(Debug, Clone)]
pub(crate) struct WeakInjector {
    inner: Weak<Inner>,
}

impl WeakInjector {
    pub(crate) fn upgrade(&self) -> Option<Injector> {
        self.inner.upgrade().map(|inner| Injector { inner })
    }
}

/// Something `contains` can look for: an alias or a registered callable.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Alias(&'a str),
    Callable(&'a Callable),
}

impl<'a> From<&'a str> for Lookup<'a> {
    fn from(alias: &'a str) -> Self {
        Lookup::Alias(alias)
    }
}

impl<'a> From<&'a String> for Lookup<'a> {
    fn from(alias: &'a String) -> Self {
        Lookup::Alias(alias)
    }
}

impl<'a> From<&'a Callable> for Lookup<'a> {
    fn from(callable: &'a Callable) -> Self {
        Lookup::Callable(callable)
    }
}

impl Injector {
    /// Creates an empty injector with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InjectorConfig) -> Self {
        Injector {
            inner: Arc::new(Inner {
                config,
                ..Inner::default()
            }),
        }
    }

    pub fn config(&self) -> InjectorConfig {
        self.inner.config
    }

    pub(crate) fn downgrade(&self) -> WeakInjector {
        WeakInjector {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // The map only ever sees single inserts and removals, so a poisoned lock
    // still guards a consistent map.
    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing callback support
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every injector interaction.
    ///
    /// # Example
    /// ```rust
    /// use alias_injector::Injector;
    ///
    /// let injector = Injector::new();
    /// injector.set_trace_callback(|event| println!("[injector] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&InjectorEvent) + Send + Sync + 'static) {
        let mut guard = self.inner.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback. Events are still logged through `tracing`.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.inner.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    pub(crate) fn emit_event(&self, event: InjectorEvent) {
        tracing::trace!(%event, "injector event");

        let callback = self
            .inner
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------------------------------

    /// Registers `callable` under `alias`.
    ///
    /// # Errors
    ///
    /// `DuplicateAlias` if `alias` is already registered. The injector is left
    /// unchanged in that case.
    pub fn register(&self, callable: Callable, alias: impl Into<String>) -> Result<()> {
        self.register_partial(callable, alias, Kwargs::new())
    }

    /// Registers `callable` under `alias` with `fixed` keyword arguments bound
    /// into every call.
    pub fn register_partial(
        &self,
        callable: Callable,
        alias: impl Into<String>,
        fixed: Kwargs,
    ) -> Result<()> {
        let alias = alias.into();

        match self.entries().entry(alias.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(%alias, "alias already registered");
                return Err(InjectionError::duplicate(&alias));
            }
            Entry::Vacant(slot) => {
                let callable = if fixed.is_empty() {
                    callable
                } else {
                    callable.partial(fixed)
                };
                slot.insert(callable);
            }
        }

        self.emit_event(InjectorEvent::Register { alias });
        Ok(())
    }

    /// Registers a shared instance; every call of the entry returns it.
    pub fn register_value<T: Send + Sync + 'static>(
        &self,
        value: T,
        alias: impl Into<String>,
    ) -> Result<()> {
        self.register(Callable::from_value(value), alias)
    }

    /// Decorator form of [`Injector::register`].
    ///
    /// ```rust
    /// use alias_injector::{Args, Callable, Injector};
    ///
    /// let injector = Injector::new();
    /// injector.provider("days")(Callable::new(|_: Args| Ok(365u32))).unwrap();
    ///
    /// let days = injector.get("days").unwrap();
    /// assert_eq!(days.call_cloned::<u32>(Args::new()).unwrap(), 365);
    /// ```
    pub fn provider(&self, alias: impl Into<String>) -> impl FnOnce(Callable) -> Result<()> {
        self.provider_partial(alias, Kwargs::new())
    }

    /// Decorator form of [`Injector::register_partial`].
    pub fn provider_partial(
        &self,
        alias: impl Into<String>,
        fixed: Kwargs,
    ) -> impl FnOnce(Callable) -> Result<()> {
        let injector = self.clone();
        let alias = alias.into();
        move |callable| injector.register_partial(callable, alias, fixed)
    }

    // -------------------------------------------------------------------------------------------------
    // Mapping access
    // -------------------------------------------------------------------------------------------------

    /// Returns the callable registered under `alias`.
    ///
    /// # Errors
    ///
    /// `AliasNotFound` if nothing is registered under `alias`.
    pub fn get(&self, alias: &str) -> Result<Callable> {
        let found = self.entries().get(alias).cloned();

        self.emit_event(InjectorEvent::Get {
            alias: alias.to_owned(),
            found: found.is_some(),
        });

        found.ok_or_else(|| InjectionError::not_found(alias))
    }

    /// Assigns `callable` to `alias`, replacing any existing entry.
    ///
    /// Unlike `register` this never fails; the replaced entry is returned.
    pub fn set(&self, alias: impl Into<String>, callable: Callable) -> Option<Callable> {
        let alias = alias.into();
        let previous = self.entries().insert(alias.clone(), callable);

        self.emit_event(InjectorEvent::Overwrite {
            alias,
            replaced: previous.is_some(),
        });

        previous
    }

    /// Removes `alias`, keeping the order of the remaining entries.
    ///
    /// # Errors
    ///
    /// `AliasNotFound` if nothing is registered under `alias`.
    pub fn remove(&self, alias: &str) -> Result<Callable> {
        let removed = self.entries().shift_remove(alias);

        self.emit_event(InjectorEvent::Remove {
            alias: alias.to_owned(),
            found: removed.is_some(),
        });

        removed.ok_or_else(|| InjectionError::not_found(alias))
    }

    /// Whether `item` is a registered alias or a registered callable.
    pub fn contains<'a>(&self, item: impl Into<Lookup<'a>>) -> bool {
        let item = item.into();
        let found = {
            let entries = self.entries();
            match item {
                Lookup::Alias(alias) => entries.contains_key(alias),
                Lookup::Callable(callable) => entries.values().any(|entry| entry == callable),
            }
        };

        let item = match item {
            Lookup::Alias(alias) => alias.to_owned(),
            Lookup::Callable(callable) => callable.display_name().to_owned(),
        };
        self.emit_event(InjectorEvent::Contains { item, found });

        found
    }

    /// Registered aliases in enumeration order.
    pub fn aliases(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Removes every entry. The tracing callback is kept.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit_event(InjectorEvent::Clear {});
        self.entries().clear();
    }

    // -------------------------------------------------------------------------------------------------
    // Injection
    // -------------------------------------------------------------------------------------------------

    /// Builds a decorator that injects the named aliases.
    ///
    /// An empty alias list behaves like [`Injector::inject_all`].
    pub fn inject<I, S>(&self, aliases: I) -> Inject
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Inject::new(self.clone(), aliases.into_iter().map(Into::into).collect())
    }

    /// Builds a decorator that injects whatever is registered at call time.
    pub fn inject_all(&self) -> Inject {
        Inject::new(self.clone(), Vec::new())
    }

    /// Picks the entries to inject into one call of `target`.
    ///
    /// An alias is injected only when it names a declared parameter of
    /// `target` that the caller has not bound, by keyword or by position.
    pub(crate) fn resolve(
        &self,
        requested: &[String],
        target: &Callable,
        args: &Args,
    ) -> Result<Vec<(String, Callable)>> {
        let unbound = |alias: &str| match target.param_index(alias) {
            Some(index) => index >= args.positional_len() && !args.has_keyword(alias),
            None => false,
        };

        let entries = self.entries();
        let mut resolved: Vec<(String, Callable)> = Vec::new();

        if requested.is_empty() {
            for (alias, callable) in entries.iter() {
                if unbound(alias) {
                    resolved.push((alias.clone(), callable.clone()));
                }
            }
            return Ok(resolved);
        }

        for alias in requested {
            match entries.get(alias) {
                Some(callable) => {
                    if unbound(alias) && !resolved.iter().any(|(seen, _)| seen == alias) {
                        resolved.push((alias.clone(), callable.clone()));
                    }
                }
                None if self.inner.config.missing_alias == MissingAlias::Fail => {
                    tracing::debug!(
                        %alias,
                        function = target.display_name(),
                        "requested alias is not registered"
                    );
                    return Err(InjectionError::not_found(alias));
                }
                None => {}
            }
        }

        Ok(resolved)
    }
}

impl fmt::Display for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Injector> instance: ({})", self.aliases().join(", "))
    }
}

impl fmt::Debug for Injector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector")
            .field("aliases", &self.aliases())
            .field("config", &self.inner.config)
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kwargs;
    use std::sync::Mutex as StdMutex;

    fn formatter() -> Callable {
        Callable::function("formatter", ["param_1", "param_2"], |args: Args| {
            let a = args.param::<&str>(0, "param_1")?;
            let b = args.param::<&str>(1, "param_2")?;
            Ok(format!("({a}: {b})"))
        })
    }

    fn adder() -> Callable {
        Callable::function("adder", ["x", "y"], |args: Args| {
            Ok(args.param::<i32>(0, "x")? + args.param::<i32>(1, "y")?)
        })
    }

    #[test]
    fn test_register_and_get() -> Result<()> {
        let injector = Injector::new();
        let op = formatter();
        injector.register(op.clone(), "op")?;

        let stored = injector.get("op")?;
        assert!(stored.ptr_eq(&op));
        assert_eq!(
            stored.call_cloned::<String>(Args::new().arg("foo").arg("bar"))?,
            "(foo: bar)"
        );
        Ok(())
    }

    #[test]
    fn test_register_duplicate_leaves_entry_unchanged() -> Result<()> {
        let injector = Injector::new();
        let op = formatter();
        injector.register(op.clone(), "op")?;

        let err = injector.register(Callable::new(|_| Ok("FooBar")), "op");
        assert_eq!(err, Err(InjectionError::duplicate("op")));
        assert!(injector.get("op")?.ptr_eq(&op));
        assert_eq!(injector.aliases(), vec!["op"]);
        Ok(())
    }

    #[test]
    fn test_register_partial() -> Result<()> {
        let injector = Injector::new();
        injector.register_partial(adder(), "add", kwargs! { "y" => 1i32 })?;

        let add = injector.get("add")?;
        assert_eq!(add.call_cloned::<i32>(Args::new().kwarg("x", 41i32))?, 42);
        Ok(())
    }

    #[test]
    fn test_register_partial_with_empty_kwargs_stores_same_callable() -> Result<()> {
        let injector = Injector::new();
        let add = adder();
        injector.register_partial(add.clone(), "add", Kwargs::new())?;
        assert!(injector.contains(&add));
        Ok(())
    }

    #[test]
    fn test_provider_registers() -> Result<()> {
        let injector = Injector::new();
        let g = adder();
        injector.provider("add")(g.clone())?;

        let add = injector.get("add")?;
        assert!(add.ptr_eq(&g));
        assert_eq!(add.call_cloned::<i32>(Args::new().arg(1).arg(100))?, 101);

        let err = injector.provider("add")(adder());
        assert_eq!(err, Err(InjectionError::duplicate("add")));
        Ok(())
    }

    #[test]
    fn test_provider_partial() -> Result<()> {
        let injector = Injector::new();
        injector.provider_partial("flag", kwargs! { "enabled" => true })(Callable::function(
            "flag",
            ["enabled"],
            |args: Args| Ok(*args.get::<bool>("enabled")?),
        ))?;

        let flag = injector.get("flag")?;
        assert!(flag.call_cloned::<bool>(Args::new())?);
        Ok(())
    }

    #[test]
    fn test_get_missing() {
        let injector = Injector::new();
        assert_eq!(
            injector.get("nope").unwrap_err(),
            InjectionError::not_found("nope")
        );
    }

    #[test]
    fn test_set_overwrites_without_error() -> Result<()> {
        let injector = Injector::new();
        injector.register(adder(), "op")?;
        injector.register(adder(), "other")?;

        let replacement = formatter();
        let previous = injector.set("op", replacement.clone());
        assert!(previous.is_some());
        assert!(injector.get("op")?.ptr_eq(&replacement));
        // assignment keeps the original position
        assert_eq!(injector.aliases(), vec!["op", "other"]);

        assert!(injector.set("art", Callable::new(|_| Ok("Hi!"))).is_none());
        assert!(injector.contains("art"));
        Ok(())
    }

    #[test]
    fn test_remove() -> Result<()> {
        let injector = Injector::new();
        injector.register(formatter(), "op")?;
        injector.register(adder(), "add")?;
        injector.register(adder(), "sub")?;

        injector.remove("add")?;
        assert_eq!(injector.aliases(), vec!["op", "sub"]);
        assert_eq!(
            injector.get("add").unwrap_err(),
            InjectionError::not_found("add")
        );
        assert_eq!(
            injector.remove("add").unwrap_err(),
            InjectionError::not_found("add")
        );
        Ok(())
    }

    #[test]
    fn test_contains_alias_and_callable() -> Result<()> {
        let injector = Injector::new();
        let op = formatter();
        injector.register(op.clone(), "op")?;

        assert!(injector.contains("op"));
        assert!(injector.contains(&"op".to_string()));
        assert!(injector.contains(&op));
        assert!(!injector.contains("add"));
        assert!(!injector.contains(&formatter()));
        Ok(())
    }

    #[test]
    fn test_partial_entry_is_not_the_original() -> Result<()> {
        let injector = Injector::new();
        let add = adder();
        injector.register_partial(add.clone(), "add", kwargs! { "x" => 1i32 })?;
        assert!(!injector.contains(&add));
        assert!(injector.contains(&injector.get("add")?));
        Ok(())
    }

    #[test]
    fn test_display_and_len() -> Result<()> {
        let injector = Injector::new();
        assert_eq!(injector.to_string(), "<Injector> instance: ()");
        assert!(injector.is_empty());

        injector.register(adder(), "art")?;
        injector.register(formatter(), "op")?;
        assert_eq!(injector.to_string(), "<Injector> instance: (art, op)");
        assert_eq!(injector.len(), 2);
        Ok(())
    }

    #[test]
    fn test_debug_lists_aliases() -> Result<()> {
        let injector = Injector::new();
        injector.register(adder(), "add")?;
        let debug = format!("{injector:?}");
        assert!(debug.starts_with("Injector { aliases: [\"add\"]"));
        Ok(())
    }

    #[test]
    fn test_clones_share_entries() -> Result<()> {
        let injector = Injector::new();
        let handle = injector.clone();
        handle.register(adder(), "add")?;
        assert!(injector.contains("add"));
        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let injector = Injector::new();
        injector.register(adder(), "add")?;
        injector.clear();
        assert!(injector.is_empty());
        Ok(())
    }

    #[test]
    fn test_trace_callback_events() -> Result<()> {
        let injector = Injector::new();
        let events = Arc::new(StdMutex::new(Vec::new()));
        let events_clone = events.clone();

        injector.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        injector.register(adder(), "add")?;
        let _ = injector.get("add");
        let _ = injector.get("sub");
        injector.set("add", formatter());
        let _ = injector.contains("add");
        let _ = injector.remove("add");
        injector.clear();

        let captured = events.lock().unwrap();
        assert_eq!(
            *captured,
            vec![
                "register { alias: add }",
                "get { alias: add, found: true }",
                "get { alias: sub, found: false }",
                "overwrite { alias: add, replaced: true }",
                "contains { item: add, found: true }",
                "remove { alias: add, found: true }",
                "Clearing the Injector",
            ]
        );
        drop(captured);

        injector.clear_trace_callback();
        Ok(())
    }

    #[test]
    fn test_failed_register_emits_nothing() -> Result<()> {
        let injector = Injector::new();
        injector.register(adder(), "add")?;

        let events = Arc::new(StdMutex::new(Vec::new()));
        let events_clone = events.clone();
        injector.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(e.to_string());
        });

        assert!(injector.register(adder(), "add").is_err());
        assert!(events.lock().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn test_callback_may_use_injector() -> Result<()> {
        let injector = Injector::new();
        let handle = injector.clone();
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_clone = seen.clone();

        injector.set_trace_callback(move |e| {
            if let InjectorEvent::Register { .. } = e {
                seen_clone.lock().unwrap().push(handle.len());
            }
        });

        injector.register(adder(), "a")?;
        injector.register(adder(), "b")?;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
        Ok(())
    }

    #[test]
    fn test_register_value() -> Result<()> {
        let injector = Injector::new();
        injector.register_value(String::from("postgres://"), "dsn")?;

        let dsn = injector.get("dsn")?.call_as::<String>(Args::new())?;
        assert_eq!(dsn.as_str(), "postgres://");
        Ok(())
    }

    #[test]
    fn test_thread_safety() -> Result<()> {
        use std::thread;

        let injector = Injector::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let injector = injector.clone();
                thread::spawn(move || injector.register(adder(), format!("add_{i}")))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap()?;
        }
        assert_eq!(injector.len(), 4);
        Ok(())
    }
}
