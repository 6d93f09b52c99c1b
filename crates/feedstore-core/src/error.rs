//! Unified error type for feedstore.
//!
//! Every failure a store operation can report funnels into [`Error`].
//! Configuration problems ([`Error::ModelNotFound`], [`Error::SchemaMismatch`])
//! are raised synchronously when a store is opened; everything else travels
//! back through the result of the individual operation.

/// Unified error type covering all failure modes in feedstore.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The schema model named at construction time is not known.
    #[error("Model not found: {model_name}")]
    ModelNotFound {
        /// The model name that was looked up.
        model_name: String,
    },

    /// The database was written by a newer schema than this build supports.
    #[error("Schema mismatch: database is at version {found}, supported up to {supported}")]
    SchemaMismatch {
        /// Highest migration version recorded in the database.
        found: i64,
        /// Highest migration version the resolved model knows about.
        supported: i64,
    },

    /// A backing-store operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persisted data could not be translated back into domain values.
    #[error("Corrupt cache record: {0}")]
    Corrupt(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Input data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store's worker is no longer accepting or answering requests.
    #[error("Feed store is closed")]
    StoreClosed,
}

impl Error {
    /// Whether this error prevents a store from being constructed at all,
    /// as opposed to failing a single operation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::ModelNotFound { .. } | Error::SchemaMismatch { .. })
    }

    /// Convenience constructor for [`Error::ModelNotFound`].
    pub fn model_not_found(model_name: impl Into<String>) -> Self {
        Error::ModelNotFound {
            model_name: model_name.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::Corrupt`].
    pub fn corrupt(message: impl Into<String>) -> Self {
        Error::Corrupt(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
