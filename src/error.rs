//! Error types for the container

use thiserror::Error;

/// Failure boxed out of a user supplied service body or extender
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors reported by resolution, extension and parameter loading
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No entry exists for the key
    #[error("Identifier '{key}' is not defined.")]
    NotDefined { key: String },

    /// The key holds a plain value where a service was required
    #[error("Identifier '{key}' does not contain an object definition.")]
    NotAService { key: String },

    /// A typed accessor found a value of another type
    #[error("Identifier '{key}' does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// Parameters document could not be parsed
    #[error("Invalid parameters document: {0}")]
    Config(#[from] toml::de::Error),

    /// Raised by user code inside a service body or extender
    #[error(transparent)]
    Service(BoxError),
}

impl ContainerError {
    pub(crate) fn not_defined(key: &str) -> Self {
        ContainerError::NotDefined { key: key.to_string() }
    }

    pub(crate) fn not_a_service(key: &str) -> Self {
        ContainerError::NotAService { key: key.to_string() }
    }

    /// Wrap an arbitrary error raised inside a service body
    pub fn service<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        ContainerError::Service(err.into())
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ContainerError>;
