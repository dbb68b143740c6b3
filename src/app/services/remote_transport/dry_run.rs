//! Transport that records statements instead of sending them

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use super::transport::{Transport, TransportOutcome};

/// Always-successful transport that counts statements and bytes
#[derive(Debug, Default)]
pub struct DryRunTransport {
    statements: AtomicUsize,
    bytes: AtomicUsize,
}

impl DryRunTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> usize {
        self.statements.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl Transport for DryRunTransport {
    async fn submit(&self, statement: &str, _timeout: Duration) -> TransportOutcome {
        let count = self.statements.fetch_add(1, Ordering::Relaxed) + 1;
        self.bytes.fetch_add(statement.len(), Ordering::Relaxed);
        debug!("Dry run statement {} ({} bytes)", count, statement.len());
        Ok(())
    }
}
