use thiserror::Error;

/// A size value that cannot be rendered into a media-query value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit value: {value}")]
pub struct InvalidUnitError {
    /// Debug rendering of the offending value.
    pub value: String,
}

impl InvalidUnitError {
    pub(crate) fn new(value: impl std::fmt::Debug) -> Self {
        Self {
            value: format!("{value:?}"),
        }
    }
}

/// Errors raised while installing breakpoints.
///
/// Every variant aborts installation: nothing is published when one is returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("breakpoint '{breakpoint}' has an invalid value")]
    InvalidUnit {
        breakpoint: String,
        #[source]
        source: InvalidUnitError,
    },
    #[error(
        "without a media environment every breakpoint needs a default value \
         (defaultValue is missing for breakpoint '{breakpoint}')"
    )]
    MissingDefaultValue { breakpoint: String },
    #[error("could not watch media query '{condition}': {message}")]
    MatchMedia { condition: String, message: String },
    #[error("invalid breakpoint configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid breakpoint configuration: {0}")]
    InvalidConfig(String),
}
