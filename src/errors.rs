//! Unified error types for the sofa pricing core.
//!
//! Validation problems are reported before anything touches the database.
//! Parse anomalies in stored documents are never errors; the mapper resolves
//! them to safe defaults and logs them instead.

use thiserror::Error;

/// All failures surfaced by the catalog services, configuration and binary.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// User input rejected before any write
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// A price or quantity that is negative or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// A markup percentage that would divide by zero or invert the list price
    #[error("Invalid markup percentage: {markup} (must be at least 0 and below 100)")]
    InvalidMarkup {
        /// The rejected percentage
        markup: f64,
    },

    /// Another record already uses this name or code
    #[error("A {kind} named '{name}' already exists")]
    DuplicateName {
        /// Kind of record ("supplier", "component", ...)
        kind: &'static str,
        /// The conflicting name or code
        name: String,
    },

    /// No product with this id
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested id
        id: i64,
    },

    /// No variant with this id
    #[error("Variant not found: {id}")]
    VariantNotFound {
        /// Requested id
        id: i64,
    },

    /// No catalog component with this id
    #[error("Component not found: {id}")]
    ComponentNotFound {
        /// Requested id
        id: i64,
    },

    /// No supplier with this id
    #[error("Supplier not found: {id}")]
    SupplierNotFound {
        /// Requested id
        id: i64,
    },

    /// Some writes of a multi-document save failed. Completed writes are kept;
    /// the caller retries the remaining step.
    #[error("{failed} of {total} writes failed: {message}")]
    BatchFailed {
        /// Number of failed writes
        failed: usize,
        /// Number of attempted writes
        total: usize,
        /// Messages of the individual failures
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for errors caused by rejected input rather than storage failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidMarkup { .. }
                | Self::DuplicateName { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
