use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(raidcal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(raidcal::config))]
    Config(String),

    #[error("Raid Helper API error for server {server_id}: {reason}")]
    #[diagnostic(code(raidcal::fetch))]
    Fetch { server_id: String, reason: String },

    #[error("Malformed event record: {0}")]
    #[diagnostic(code(raidcal::parse))]
    Parse(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(raidcal::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(raidcal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(raidcal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(raidcal::other))]
    Other(String),
}

// Implement From for TOML serialization errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create fetch errors tagged with the server they came from
pub fn fetch_error(server_id: &str, reason: &str) -> Error {
    Error::Fetch {
        server_id: server_id.to_string(),
        reason: reason.to_string(),
    }
}

/// Helper to create parse errors for individual event records
pub fn parse_error(message: &str) -> Error {
    Error::Parse(message.to_string())
}

/// Helper to create component errors
#[allow(dead_code)]
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}

/// Helper to create other errors
#[allow(dead_code)]
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
