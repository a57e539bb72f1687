use std::fmt;

/// Rejected [`RegistryOptions`](crate::RegistryOptions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The options document could not be parsed.
    Parse(String),
    EmptyWildcard,
    WildcardContainsSeparator {
        wildcard: String,
        separator: char,
    },
    /// Registration trims names, so a padded wildcard could never be registered.
    WildcardNotTrimmed(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Parse(reason) => write!(f, "invalid registry options: {}", reason),
            OptionsError::EmptyWildcard => write!(f, "wildcard event name must not be empty"),
            OptionsError::WildcardContainsSeparator {
                wildcard,
                separator,
            } => write!(
                f,
                "wildcard event name {:?} contains the name separator {:?}",
                wildcard, separator
            ),
            OptionsError::WildcardNotTrimmed(wildcard) => write!(
                f,
                "wildcard event name {:?} has surrounding whitespace",
                wildcard
            ),
        }
    }
}

impl std::error::Error for OptionsError {}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        OptionsError::Parse(err.to_string())
    }
}
