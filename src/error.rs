use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the calendar client
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The schedule service could not be reached or answered with a non-success status
    #[error("Transport error: {0}")]
    #[diagnostic(code(redwood_calendar::transport))]
    Transport(String),

    /// A required event field is missing or malformed
    #[error("Validation error: {0}")]
    #[diagnostic(code(redwood_calendar::validation))]
    Validation(String),

    #[error("Schedule not found: {0}")]
    #[diagnostic(code(redwood_calendar::not_found))]
    NotFound(String),

    #[error("The {0} operation is disabled by configuration")]
    #[diagnostic(
        code(redwood_calendar::feature_disabled),
        help("check the ENABLE_CREATE / ENABLE_DELETE settings")
    )]
    FeatureDisabled(&'static str),

    #[error("Environment error: {0}")]
    #[diagnostic(code(redwood_calendar::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(redwood_calendar::config))]
    Config(String),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(redwood_calendar::serialization))]
    Serialization(String),

    #[error(transparent)]
    #[diagnostic(code(redwood_calendar::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(redwood_calendar::other))]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalendarResult<T> = Result<T, Error>;

pub fn transport_error(message: &str) -> Error {
    Error::Transport(message.to_string())
}

pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

pub fn not_found_error(id: &str) -> Error {
    Error::NotFound(id.to_string())
}

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
