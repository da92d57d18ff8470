//! Common types and utilities shared across Almanac crates.
//!
//! This crate defines the shared error type and the observability helpers used
//! throughout the Almanac workspace. It stays small so that every crate can
//! depend on it without pulling in the scraping or HTTP stack.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`AlmanacError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use almanac_common::AlmanacError;
//!
//! let err = AlmanacError::Selector {
//!     name: "card",
//!     selector: "..bad".into(),
//!     message: "unexpected token".into(),
//! };
//! assert!(err.to_string().contains("card"));
//! ```

pub mod observability;

/// Error types used across the Almanac system.
///
/// Per-page fetch failures never surface here: they are contained inside the
/// calendar pipeline. Only setup and persistence failures are fatal.
#[derive(thiserror::Error, Debug)]
pub enum AlmanacError {
    /// A configured CSS selector could not be compiled.
    #[error("Invalid selector for {name} ({selector}): {message}")]
    Selector {
        name: &'static str,
        selector: String,
        message: String,
    },

    /// Writing the output document failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenient alias for results that use [`AlmanacError`].
pub type Result<T> = std::result::Result<T, AlmanacError>;
