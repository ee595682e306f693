//! Error types and handling for the weather narrator

use thiserror::Error;

/// Main error type for the weather narrator
#[derive(Error, Debug)]
pub enum NarratorError {
    /// A bundled catalog or mock document does not exist
    #[error("Resource not found: {resource}")]
    ResourceMissing { resource: String },

    /// A catalog lacks a template or word the renderers need
    #[error("Message key '{key}' missing from '{language}' catalog")]
    MessageKeyMissing { language: String, key: String },

    /// A compass code contains a letter outside N, E, S, W and b
    #[error("Invalid compass code: {code}")]
    InvalidCompassCode { code: String },

    /// A forecast or observation document is missing a field or has the wrong shape
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

}

impl NarratorError {
    /// Create a new missing resource error
    pub fn resource_missing<S: Into<String>>(resource: S) -> Self {
        Self::ResourceMissing {
            resource: resource.into(),
        }
    }

    /// Create a new missing message key error
    pub fn message_key_missing<L: Into<String>, K: Into<String>>(language: L, key: K) -> Self {
        Self::MessageKeyMissing {
            language: language.into(),
            key: key.into(),
        }
    }

    /// Create a new invalid compass code error
    pub fn invalid_compass_code<S: Into<String>>(code: S) -> Self {
        Self::InvalidCompassCode { code: code.into() }
    }

    /// Create a new malformed document error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            NarratorError::ResourceMissing { .. } => {
                "The requested language is not supported.".to_string()
            }
            NarratorError::MessageKeyMissing { .. } | NarratorError::InvalidCompassCode { .. } => {
                "The weather report could not be composed.".to_string()
            }
            NarratorError::MalformedDocument { .. } | NarratorError::Api { .. } => {
                "Unable to retrieve weather data from the provider. Please try again later."
                    .to_string()
            }
            NarratorError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            NarratorError::Validation { message } => {
                format!("Invalid input: {message}")
            }
        }
    }
}
