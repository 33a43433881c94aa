//! Error types for the gallery feed.
//!
//! # Error Hierarchy
//!
//! - [`TransportError`] - a page or resource fetch failed at the provider.
//!   Page failures become the feed's `error` state and halt pagination until
//!   retried; resource failures stay inside the tile that asked.
//! - [`AppError`] - shell-level failures of the binary (config, logging,
//!   catalog loading). Never produced by the pure core.
//!
//! Results that arrive for an abandoned filter epoch or a superseded tile
//! request are not errors; they are reported as `Stale` outcomes by the
//! components that discard them.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::source::CatalogError;
use thiserror::Error;

/// A fetch against the provider failed.
///
/// Authorization failures are ordinary transport errors as far as the feed
/// is concerned: they surface as an error state with a retry affordance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Provider rejected the session (HTTP 401).
    #[error("Not signed in: {0}")]
    Unauthorized(String),

    /// Session lacks access to the requested data (HTTP 403).
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection-level failure; no response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with an error status.
    #[error("Provider error {status}: {message}")]
    Provider {
        /// HTTP-like status code reported by the provider.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },
}

impl TransportError {
    /// Classify a provider status code the way the gallery's API layer does.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => TransportError::Unauthorized(message),
            403 => TransportError::Forbidden(message),
            404 => TransportError::NotFound(message),
            _ => TransportError::Provider { status, message },
        }
    }
}

/// Top-level error of the `gallery-feed` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log file could not be set up.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    /// The catalog file could not be read.
    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
}
