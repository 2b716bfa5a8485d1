/// What an `inject` wrapper does when an explicitly requested alias is not
/// registered at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAlias {
    /// Fail the call with `AliasNotFound` before the target runs.
    #[default]
    Fail,
    /// Inject only the requested aliases that exist.
    Skip,
}

/// Injector settings.
///
/// ```rust
/// use alias_injector::{Injector, InjectorConfig, MissingAlias};
///
/// let injector = Injector::with_config(
///     InjectorConfig::default().missing_alias(MissingAlias::Skip),
/// );
/// assert_eq!(injector.config().missing_alias, MissingAlias::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InjectorConfig {
    pub missing_alias: MissingAlias,
}

impl InjectorConfig {
    pub fn missing_alias(mut self, policy: MissingAlias) -> Self {
        self.missing_alias = policy;
        self
    }
}
