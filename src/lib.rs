//! Facility Sync Library
//!
//! A Rust library for replicating tabular facility records (care homes,
//! clinics and similar sites) from loosely-formatted source files into a
//! remote D1/SQLite database.
//!
//! This library provides tools for:
//! - Detecting the character encoding of legacy Korean CSV exports
//! - Parsing quote-aware delimited text, spreadsheet rows and local database rows
//! - Planning fixed-size upload batches with progress metrics
//! - Rendering escaped multi-row INSERT statements
//! - Submitting statements through the `wrangler` CLI or a local SQLite file
//! - Orchestrating a sequential, paced upload with success/failure accounting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_planner;
        pub mod encoding_resolver;
        pub mod record_parser;
        pub mod remote_transport;
        pub mod sql_encoder;
        pub mod upload;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FacilityRecord, SkipReason, UploadOutcome};
pub use config::Config;

/// Result type alias for facility sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for a facility sync run
///
/// Per-row and per-batch problems are recoverable and are modelled separately
/// by [`SkipReason`] and
/// [`TransportFailure`](app::services::remote_transport::TransportFailure).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input file, workbook or local database could not be read
    #[error("Failed to read source '{path}': {message}")]
    SourceRead { path: String, message: String },

    /// Parsing produced no valid records
    #[error("No valid facility records found in '{source_name}'")]
    EmptyResult { source_name: String },

    /// Destructive pre-clear statement failed, nothing was uploaded
    #[error("Pre-clear of table '{table}' failed: {message}")]
    PreClear { table: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Report could not be rendered
    #[error("Failed to render report: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local SQLite database error
    #[error("Local database error: {message}")]
    LocalDatabase {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a source read error
    pub fn source_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an empty result error
    pub fn empty_result(source_name: impl Into<String>) -> Self {
        Self::EmptyResult {
            source_name: source_name.into(),
        }
    }

    /// Create a pre-clear error
    pub fn pre_clear(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PreClear {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a local database error with context
    pub fn local_database(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::LocalDatabase {
            message: message.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        Self::LocalDatabase {
            message: "SQLite operation failed".to_string(),
            source: error,
        }
    }
}
