use thiserror::Error;

/// Result type used across the injector API.
pub type Result<T> = std::result::Result<T, InjectionError>;

/// Every failure the injector can report.
///
/// Callers that want to treat all injection failures alike can match on the
/// enum as a whole; the variants tell them apart when needed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    /// `register` was called with an alias that is already taken.
    #[error("`{alias}` alias already exists")]
    DuplicateAlias { alias: String },

    /// The alias is not registered.
    #[error("alias `{alias}` doesn't exist in the injector")]
    AliasNotFound { alias: String },

    /// A callable asked for an argument that was not supplied.
    #[error("missing argument `{name}`")]
    MissingArgument { name: String },

    /// An argument was supplied with a different type than the callable expects.
    #[error("argument `{name}` is not of type {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// A call returned a value of a different type than requested.
    #[error("call result is not of type {expected}")]
    ReturnTypeMismatch { expected: &'static str },

    /// An `inject` wrapper was called after its injector was dropped.
    #[error("the injector behind this wrapper was dropped")]
    InjectorDropped,
}

impl InjectionError {
    pub(crate) fn duplicate(alias: &str) -> Self {
        InjectionError::DuplicateAlias {
            alias: alias.to_owned(),
        }
    }

    pub(crate) fn not_found(alias: &str) -> Self {
        InjectionError::AliasNotFound {
            alias: alias.to_owned(),
        }
    }
}
