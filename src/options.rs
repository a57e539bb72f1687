use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

/// Event name whose listeners run on every dispatch.
pub const DEFAULT_WILDCARD: &str = "*";

/// Separator between names in an event-name list.
pub const DEFAULT_SEPARATOR: char = ',';

/// Tunables for a [`Registry`](crate::Registry).
///
/// The defaults reproduce the classic behavior: `"*"` is the wildcard, names
/// are comma-separated, and only registration trims whitespace around each
/// name. Options can be built in code or loaded from JSON:
///
/// ```
/// use event_registry::RegistryOptions;
///
/// let options = RegistryOptions::from_json(r#"{ "trim_dispatch_names": true }"#).unwrap();
/// assert_eq!(options.wildcard, "*");
/// assert!(options.trim_dispatch_names);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
    pub wildcard: String,
    pub separator: char,
    /// Trim names passed to `emit` and `off` the same way `on` trims them.
    pub trim_dispatch_names: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            wildcard: DEFAULT_WILDCARD.to_string(),
            separator: DEFAULT_SEPARATOR,
            trim_dispatch_names: false,
        }
    }
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wildcard event name.
    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    /// Set the separator used to split event-name lists.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Trim dispatch-side and unregister-side names too.
    pub fn with_trim_dispatch_names(mut self, trim: bool) -> Self {
        self.trim_dispatch_names = trim;
        self
    }

    /// Parse options from JSON and validate them. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: RegistryOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that the wildcard can actually be registered and dispatched.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.wildcard.is_empty() {
            return Err(OptionsError::EmptyWildcard);
        }
        if self.wildcard.contains(self.separator) {
            return Err(OptionsError::WildcardContainsSeparator {
                wildcard: self.wildcard.clone(),
                separator: self.separator,
            });
        }
        if self.wildcard.trim() != self.wildcard {
            return Err(OptionsError::WildcardNotTrimmed(self.wildcard.clone()));
        }
        Ok(())
    }
}
