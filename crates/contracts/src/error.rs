//! Layered error definitions
//!
//! Categorized by source: config / registry / persistence

use thiserror::Error;

/// Unified collaborator error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Worker Registry Errors =====
    /// Worker registry could not produce a snapshot
    #[error("worker registry '{registry}' error: {message}")]
    Registry { registry: String, message: String },

    // ===== Persistence Errors =====
    /// Assignment store read/write failure
    #[error("assignment store '{store}' error: {message}")]
    Persistence { store: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create worker registry error
    pub fn registry(registry: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registry {
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Create assignment store error
    pub fn persistence(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            store: store.into(),
            message: message.into(),
        }
    }
}
