// Digital Library - storage core and REST backend
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Error types for the digital library
//!
//! All storage operations return [`LibraryError`]. Variants are grouped by
//! the stage that produced them so callers can decide what is fatal
//! (connection and schema problems at startup) and what is a per-request
//! failure (missing rows, constraint violations, backend errors).
//!
//! ## Taxonomy
//! - `UnknownBackend`, `Connection` - backend unreachable or misconfigured
//! - `Schema` - table creation failed
//! - `NotFound` - a keyed read or update matched zero rows
//! - `Conflict` - a write violated a unique or foreign key constraint
//! - `Store` - any other backend failure
//! - `Iteration` - a multi-row read failed while scanning
//! - `Timeout` - the configured query timeout elapsed
//!
//! The core never logs these or turns them into user-facing text; adapters
//! (see `api::error`) do the translation.

use std::time::Duration;

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Result type alias using our LibraryError type
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for the digital library
#[derive(Error, Debug)]
pub enum LibraryError {
    // ===== Connection Errors =====

    /// Configured backend name is not one of the supported kinds
    #[error("db option {0} is unknown")]
    UnknownBackend(String),

    /// Backend could not be opened or the pool could not be created
    #[error("can't open {backend} db: {message}")]
    Connection {
        backend: &'static str,
        message: String,
    },

    // ===== Schema Errors =====

    /// A table could not be created
    #[error("can't init {table} table: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    // ===== Per-request Errors =====

    /// No row matched the given key
    #[error("{entity} with key {key} not found")]
    NotFound { entity: &'static str, key: String },

    /// Write violated a unique or foreign key constraint
    #[error("can't {operation} {entity} {key}: {message}")]
    Conflict {
        entity: &'static str,
        operation: &'static str,
        key: String,
        message: String,
    },

    /// Any other backend failure
    #[error("can't {operation} {entity}: {source}")]
    Store {
        entity: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A multi-row read failed partway through the result set
    #[error("error occurred while iterating over {query}: {source}")]
    Iteration {
        query: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Call exceeded the configured query timeout
    #[error("{operation} {entity} timed out after {after:?}")]
    Timeout {
        entity: &'static str,
        operation: &'static str,
        after: Duration,
    },

    // ===== Configuration Errors =====

    /// Configuration is missing or invalid
    #[error("can't load config: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for LibraryError {
    fn from(err: serde_yaml::Error) -> Self {
        LibraryError::Config(err.to_string())
    }
}

// Helper methods for creating common errors
impl LibraryError {
    /// Create a NotFound error for an entity key
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        LibraryError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Create a Config error with a message
    pub fn config<S: Into<String>>(message: S) -> Self {
        LibraryError::Config(message.into())
    }

    /// Classify a driver error raised by a write.
    ///
    /// Unique and foreign key violations become `Conflict`, everything else
    /// becomes `Store`.
    pub fn from_write(
        entity: &'static str,
        operation: &'static str,
        key: impl ToString,
        err: sqlx::Error,
    ) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation | ErrorKind::ForeignKeyViolation
            ) {
                return LibraryError::Conflict {
                    entity,
                    operation,
                    key: key.to_string(),
                    message: db_err.message().to_string(),
                };
            }
        }
        LibraryError::Store {
            entity,
            operation,
            source: err,
        }
    }

    /// Wrap a driver error raised by a read or delete
    pub fn store(entity: &'static str, operation: &'static str, err: sqlx::Error) -> Self {
        LibraryError::Store {
            entity,
            operation,
            source: err,
        }
    }

    /// Zero rows matched a keyed read or update
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound { .. })
    }

    /// A write violated a constraint
    pub fn is_conflict(&self) -> bool {
        matches!(self, LibraryError::Conflict { .. })
    }

    /// Errors that should stop the process when they happen at startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LibraryError::UnknownBackend(_)
                | LibraryError::Connection { .. }
                | LibraryError::Schema { .. }
                | LibraryError::Config(_)
        )
    }
}
