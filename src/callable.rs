//! Shared callable handles stored in the injector.

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::{Args, InjectionError, Kwargs, Result, Value};

type Func = dyn Fn(Args) -> Result<Value> + Send + Sync;

/// A type-erased callable: a function, a constructor or a fixed instance.
///
/// Cloning is cheap and keeps identity; two handles are equal when they point
/// to the same underlying function. Declared parameter names are what the
/// injector matches aliases against.
///
/// # Examples
///
/// ```rust
/// use alias_injector::{Args, Callable};
///
/// let add = Callable::function("add", ["x", "y"], |args: Args| {
///     Ok(args.param::<i32>(0, "x")? + args.param::<i32>(1, "y")?)
/// });
///
/// let sum: i32 = add.call_cloned(Args::new().arg(1).arg(100)).unwrap();
/// assert_eq!(sum, 101);
/// ```
#[derive(Clone)]
pub struct Callable {
    name: Option<Arc<str>>,
    doc: Option<Arc<str>>,
    params: Arc<[String]>,
    func: Arc<Func>,
}

impl Callable {
    /// Wraps an anonymous function without declared parameters.
    ///
    /// A function that already returns a [`Value`] has it passed through as is.
    pub fn new<T, F>(func: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Args) -> Result<T> + Send + Sync + 'static,
    {
        Self::from_raw(Arc::new(move |args: Args| {
            func(args).map(into_value)
        }))
    }

    /// Wraps a named function and declares its parameter names, in order.
    pub fn function<T, F, I, S>(name: &str, params: I, func: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Args) -> Result<T> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(func).with_name(name).with_params(params)
    }

    /// A callable that hands out the same shared instance on every call.
    pub fn from_value<T: Send + Sync + 'static>(value: T) -> Self {
        let value: Value = Arc::new(value);
        Self::from_raw(Arc::new(move |_: Args| Ok(value.clone()))).with_name(type_name::<T>())
    }

    pub(crate) fn from_raw(func: Arc<Func>) -> Self {
        Callable {
            name: None,
            doc: None,
            params: Arc::from(Vec::new()),
            func,
        }
    }

    /// Copies name, doc and declared parameters from `other`.
    pub(crate) fn with_metadata_of(mut self, other: &Callable) -> Self {
        self.name = other.name.clone();
        self.doc = other.doc.clone();
        self.params = other.params.clone();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(Arc::from(doc));
        self
    }

    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Position of a declared parameter.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p == name)
    }

    pub fn call(&self, args: Args) -> Result<Value> {
        (self.func)(args)
    }

    /// Calls and returns the result as a shared `Arc<T>`.
    pub fn call_as<T: Send + Sync + 'static>(&self, args: Args) -> Result<Arc<T>> {
        self.call(args)?
            .downcast::<T>()
            .map_err(|_| InjectionError::ReturnTypeMismatch {
                expected: type_name::<T>(),
            })
    }

    /// Calls and returns a clone of the result.
    pub fn call_cloned<T: Clone + Send + Sync + 'static>(&self, args: Args) -> Result<T> {
        let arc = self.call_as::<T>(args)?;
        Ok((*arc).clone())
    }

    /// Binds `fixed` keyword arguments permanently.
    ///
    /// Keywords passed at call time still take precedence. The result is a new
    /// callable with its own identity and the same metadata.
    pub fn partial(&self, fixed: Kwargs) -> Callable {
        let inner = self.func.clone();
        Callable {
            name: self.name.clone(),
            doc: self.doc.clone(),
            params: self.params.clone(),
            func: Arc::new(move |args: Args| inner(args.with_defaults(&fixed))),
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.func).cast::<()>(),
            Arc::as_ptr(&other.func).cast::<()>(),
        )
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name().unwrap_or("<anonymous>")
    }
}

fn into_value<T: Send + Sync + 'static>(value: T) -> Value {
    let value: Value = Arc::new(value);
    match value.downcast::<Value>() {
        Ok(inner) => (*inner).clone(),
        Err(value) => value,
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callable {}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.display_name())
            .field("params", &self.params)
            .field("func", &Arc::as_ptr(&self.func).cast::<()>())
            .finish()
    }
}
