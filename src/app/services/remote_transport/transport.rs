//! Transport trait and outcome types

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::app::models::excerpt;
use crate::constants::DIAGNOSTIC_EXCERPT_CHARS;

/// Result of submitting one statement
pub type TransportOutcome = std::result::Result<(), TransportFailure>;

/// Delivers SQL statements to a destination database
///
/// Implementations must not retry internally; the caller decides what a
/// failure means for the run.
pub trait Transport {
    fn submit(
        &self,
        statement: &str,
        timeout: Duration,
    ) -> impl Future<Output = TransportOutcome> + Send;
}

/// Why a statement was not applied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The remote command exited unsuccessfully
    #[error("command exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The remote command did not finish in time and was killed
    #[error("command timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },

    /// The remote command could not be started or awaited
    #[error("failed to launch command: {message}")]
    Launch { message: String },

    /// The local database rejected the statement
    #[error("local database error: {message}")]
    Local { message: String },
}

impl TransportFailure {
    /// Build a non-zero exit failure, keeping a bounded stderr excerpt
    pub fn non_zero_exit(code: Option<i32>, stderr: &str) -> Self {
        Self::NonZeroExit {
            code,
            stderr: excerpt(stderr.trim(), DIAGNOSTIC_EXCERPT_CHARS),
        }
    }

    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    pub fn local(message: impl Into<String>) -> Self {
        Self::Local {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NonZeroExit { .. } => "non_zero_exit",
            Self::TimedOut { .. } => "timed_out",
            Self::Launch { .. } => "launch",
            Self::Local { .. } => "local",
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}
