//! Statement delivery to the destination database
//!
//! Every destination sits behind the [`Transport`] trait: the orchestrator
//! hands over one SQL statement with a timeout and gets back a
//! [`TransportOutcome`]. Failures are recoverable values, never panics or
//! fatal errors, so one bad batch cannot end a run.
//!
//! # Implementations
//!
//! - [`ProcessTransport`] - runs the `wrangler d1 execute` CLI as a child
//!   process with a minimal environment
//! - [`SqliteTransport`] - executes against a local SQLite file
//! - [`DryRunTransport`] - counts statements without sending them
//!
//! Credentials travel as an [`ApiToken`], which never prints its value.

pub mod dry_run;
pub mod process;
pub mod sqlite;
pub mod token;
pub mod transport;

#[cfg(test)]
pub mod tests;

pub use dry_run::DryRunTransport;
pub use process::ProcessTransport;
pub use sqlite::SqliteTransport;
pub use token::ApiToken;
pub use transport::{Transport, TransportFailure, TransportOutcome};
