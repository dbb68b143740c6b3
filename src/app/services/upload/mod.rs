//! Sequential, paced upload of facility records
//!
//! This module ties the pipeline together: it loads records from a
//! [`RecordSource`](crate::app::services::record_parser::RecordSource),
//! optionally clears the destination table, plans batches, encodes each one
//! as a single INSERT and submits it through a
//! [`Transport`](crate::app::services::remote_transport::Transport), pausing
//! between batches.
//!
//! A failed batch is counted and the run moves on; only source, pre-clear
//! and configuration problems end a run early. The returned [`UploadReport`]
//! always satisfies `success_count + failure_count == total`.
//!
//! # Example
//!
//! ```rust,no_run
//! use facility_sync::app::services::record_parser::RecordSource;
//! use facility_sync::app::services::remote_transport::DryRunTransport;
//! use facility_sync::app::services::upload::{NoDelay, UploadOrchestrator};
//! use facility_sync::Config;
//!
//! # async fn example() -> facility_sync::Result<()> {
//! let source = RecordSource::DelimitedText("facilities.csv".into());
//! let mut orchestrator =
//!     UploadOrchestrator::new(Config::default(), DryRunTransport::new(), NoDelay);
//! let report = orchestrator.run(&source).await?;
//! println!("{} of {} uploaded", report.success_count, report.total);
//! # Ok(())
//! # }
//! ```

pub mod orchestrator;
pub mod pacing;
pub mod progress;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use orchestrator::{RunPhase, UploadOrchestrator};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use progress::{ProgressReporter, format_progress_line};
pub use report::{UploadReport, UploadTally};
