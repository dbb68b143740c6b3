//! Transport that applies statements to a local SQLite database

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

use super::transport::{Transport, TransportFailure, TransportOutcome};
use crate::{Error, Result};

/// Executes statements against a local database file
///
/// The destination table must already exist. Timeouts do not apply to
/// local execution.
#[derive(Debug)]
pub struct SqliteTransport {
    connection: Mutex<Connection>,
}

impl SqliteTransport {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        info!("Using local database target: {}", path.display());
        let connection = Connection::open(path).map_err(|e| {
            Error::local_database(format!("Failed to open {}", path.display()), e)
        })?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_connection<R>(&self, f: impl FnOnce(&Connection) -> R) -> R {
        let connection = self
            .connection
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&connection)
    }

    fn execute(&self, statement: &str) -> TransportOutcome {
        let connection = self
            .connection
            .lock()
            .map_err(|_| TransportFailure::local("connection lock poisoned"))?;

        connection
            .execute_batch(statement)
            .map_err(|e| TransportFailure::local(e.to_string()))?;

        debug!("Applied statement locally ({} bytes)", statement.len());
        Ok(())
    }
}

impl Transport for SqliteTransport {
    async fn submit(&self, statement: &str, _timeout: Duration) -> TransportOutcome {
        self.execute(statement)
    }
}
