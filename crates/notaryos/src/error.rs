//! Error types for notaryos.
//!
//! This module defines the crate-wide error type. Outcomes a user is expected
//! to correct (a bad email at sign-in, a blank form field) have their own
//! small enums next to the code that produces them; they convert into
//! [`Error`] and are reported as toasts (see [`Error::is_user_facing`]).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for notaryos operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the storage database.
    #[error("failed to open storage at {path}: {source}")]
    StorageOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A storage query failed.
    #[error("storage query failed: {0}")]
    StorageQuery(#[from] rusqlite::Error),

    /// Failed to run storage migrations.
    #[error("storage migration failed: {message}")]
    StorageMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Session Errors ===
    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Sign-in was rejected.
    #[error(transparent)]
    Auth(#[from] crate::session::AuthError),

    // === Form Errors ===
    /// A submitted form is incomplete.
    #[error(transparent)]
    Form(#[from] crate::screens::FormError),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for notaryos operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error means nobody is signed in.
    #[must_use]
    pub fn is_not_signed_in(&self) -> bool {
        matches!(self, Self::NotSignedIn)
    }

    /// Whether the user can fix this by changing their input.
    ///
    /// Such errors are shown as toasts; everything else is a failure.
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::Form(_) | Self::NotSignedIn)
    }
}
