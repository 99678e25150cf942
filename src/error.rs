use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the scheduling core
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Teacher not found: {0}")]
    #[diagnostic(code(tutor_schedule::teacher_not_found))]
    TeacherNotFound(String),

    #[error("Exception not found: {0}")]
    #[diagnostic(code(tutor_schedule::exception_not_found))]
    ExceptionNotFound(String),

    #[error("Validation error: {0}")]
    #[diagnostic(
        code(tutor_schedule::validation),
        help("times are 24-hour \"HH:mm\" strings and dayOfWeek runs 0 (Saturday) to 6 (Friday)")
    )]
    Validation(String),

    #[error("Storage error: {0}")]
    #[diagnostic(code(tutor_schedule::storage))]
    Storage(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(tutor_schedule::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(tutor_schedule::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(tutor_schedule::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(tutor_schedule::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(tutor_schedule::other))]
    Other(String),
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// TOML is only read, never written, so only the deserializer error is mapped
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ScheduleResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create storage errors
pub fn storage_error(message: &str) -> Error {
    Error::Storage(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
