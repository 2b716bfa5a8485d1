//! Type-erased call arguments.
//!
//! Values travel as `Arc<dyn Any + Send + Sync>`, the same erased storage the
//! injector uses for everything it hands out. Callables pull typed references
//! back out with [`Args::get`], [`Args::at`] or [`Args::param`].

use std::any::{type_name, Any};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::{Callable, InjectionError, Result};

/// A type-erased, shared value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Ordered keyword arguments, used for fixed arguments bound at registration.
pub type Kwargs = IndexMap<String, Value>;

/// Arguments of a single call: positional values followed by keyword values.
#[derive(Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Kwargs,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.positional.push(Arc::new(value));
        self
    }

    /// Sets a keyword argument, replacing any previous value under `name`.
    pub fn kwarg<T: Send + Sync + 'static>(mut self, name: impl Into<String>, value: T) -> Self {
        self.keywords.insert(name.into(), Arc::new(value));
        self
    }

    /// Sets a keyword argument from an already erased value.
    pub fn insert_value(&mut self, name: impl Into<String>, value: Value) {
        self.keywords.insert(name.into(), value);
    }

    /// Whether the caller passed `name` as a keyword.
    pub fn has_keyword(&self, name: &str) -> bool {
        self.keywords.contains_key(name)
    }

    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.keywords.keys().map(String::as_str)
    }

    /// Typed access to a keyword argument.
    pub fn get<T: 'static>(&self, name: &str) -> Result<&T> {
        let value = self
            .keywords
            .get(name)
            .ok_or_else(|| InjectionError::MissingArgument { name: name.into() })?;
        downcast(value, name)
    }

    /// Typed access to a positional argument.
    pub fn at<T: 'static>(&self, index: usize) -> Result<&T> {
        let name = format!("#{index}");
        let value = self
            .positional
            .get(index)
            .ok_or_else(|| InjectionError::MissingArgument { name: name.clone() })?;
        downcast(value, &name)
    }

    /// Typed access to a parameter that may be passed either way.
    ///
    /// The keyword `name` wins; otherwise the positional argument at `index`
    /// is used.
    pub fn param<T: 'static>(&self, index: usize, name: &str) -> Result<&T> {
        match self.keywords.get(name) {
            Some(value) => downcast(value, name),
            None => match self.positional.get(index) {
                Some(value) => downcast(value, name),
                None => Err(InjectionError::MissingArgument { name: name.into() }),
            },
        }
    }

    /// Shorthand for a parameter holding a callable, typically an injected one.
    pub fn callable(&self, index: usize, name: &str) -> Result<&Callable> {
        self.param::<Callable>(index, name)
    }

    /// Fills in `fixed` keywords the caller did not pass explicitly.
    pub(crate) fn with_defaults(mut self, fixed: &Kwargs) -> Self {
        for (name, value) in fixed {
            if !self.keywords.contains_key(name) {
                self.keywords.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("positional", &self.positional.len())
            .field("keywords", &self.keywords.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn downcast<'a, T: 'static>(value: &'a Value, name: &str) -> Result<&'a T> {
    (**value)
        .downcast_ref::<T>()
        .ok_or_else(|| InjectionError::TypeMismatch {
            name: name.into(),
            expected: type_name::<T>(),
        })
}
