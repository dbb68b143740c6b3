//! Upload run state machine

use chrono::Utc;
use indicatif::HumanCount;
use tracing::{debug, error, info, warn};

use super::pacing::Pacer;
use super::progress::ProgressReporter;
use super::report::{ReportContext, UploadReport, UploadTally};
use crate::app::models::{FacilityRecord, UploadOutcome};
use crate::app::services::batch_planner::BatchPlan;
use crate::app::services::record_parser::{ParseStats, RecordSource};
use crate::app::services::remote_transport::Transport;
use crate::app::services::sql_encoder::SqlBatchEncoder;
use crate::config::Config;
use crate::{Error, Result};

/// Phases of one upload run, in order
///
/// `PreClearing` only happens when the table is being replaced; `Encoding`,
/// `Uploading` and `Pausing` repeat per batch, with no pause after the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Reading,
    PreClearing,
    Planning,
    Encoding,
    Uploading,
    Pausing,
    Reporting,
    Done,
}

/// Drives parsing, planning, encoding and submission for one run
pub struct UploadOrchestrator<T, P> {
    config: Config,
    transport: T,
    pacer: P,
    progress: ProgressReporter,
    show_progress: bool,
    phase: RunPhase,
}

impl<T, P> UploadOrchestrator<T, P>
where
    T: Transport,
    P: Pacer,
{
    /// `config` should already be validated
    pub fn new(config: Config, transport: T, pacer: P) -> Self {
        Self {
            config,
            transport,
            pacer,
            progress: ProgressReporter::new(),
            show_progress: false,
            phase: RunPhase::Idle,
        }
    }

    /// Draw a progress bar while uploading
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Load `source` and upload every valid record
    pub async fn run(&mut self, source: &RecordSource) -> Result<UploadReport> {
        let started_at = Utc::now();

        self.enter(RunPhase::Reading);
        info!("Reading {}", source);
        let parsed = source.load(&self.config)?;

        if parsed.records.is_empty() {
            error!("No valid facility records in {}", source);
            return Err(Error::empty_result(source.path().display().to_string()));
        }
        info!(
            "Parsed {} valid facility records",
            HumanCount(parsed.record_count() as u64)
        );

        let context = ReportContext {
            source: source.to_string(),
            encoding: parsed.encoding.clone(),
            table: self.config.upload.table.clone(),
            replaced: self.config.upload.replace,
            parse_stats: parsed.stats.clone(),
            started_at,
        };

        self.upload(&parsed.records, context).await
    }

    /// Upload records that were obtained elsewhere
    pub async fn upload_records(&mut self, records: &[FacilityRecord]) -> Result<UploadReport> {
        if records.is_empty() {
            return Err(Error::empty_result("in-memory records"));
        }

        let context = ReportContext {
            source: "in-memory records".to_string(),
            encoding: None,
            table: self.config.upload.table.clone(),
            replaced: self.config.upload.replace,
            parse_stats: ParseStats::new(),
            started_at: Utc::now(),
        };

        self.upload(records, context).await
    }

    async fn upload(
        &mut self,
        records: &[FacilityRecord],
        context: ReportContext,
    ) -> Result<UploadReport> {
        let encoder = SqlBatchEncoder::new(self.config.upload.table.as_str());

        if self.config.upload.replace {
            self.enter(RunPhase::PreClearing);
            self.pre_clear(&encoder).await?;
        }

        self.enter(RunPhase::Planning);
        let plan = BatchPlan::new(records, self.config.upload.batch_size)?;
        info!(
            "Uploading {} records to '{}' in {} batches of up to {}",
            HumanCount(plan.total_records() as u64),
            encoder.table(),
            plan.total_batches(),
            plan.batch_size()
        );

        if self.show_progress {
            self.progress.setup_progress(plan.total_batches());
        }

        let timeout = self.config.remote.insert_timeout();
        let mut tally = UploadTally::new(plan.total_records(), plan.total_batches());

        for batch in plan.iter() {
            self.enter(RunPhase::Encoding);
            let statement = encoder.encode_insert(&batch);

            self.enter(RunPhase::Uploading);
            let outcome = match self.transport.submit(&statement, timeout).await {
                Ok(()) => UploadOutcome::succeeded(batch.number, batch.len()),
                Err(failure) => {
                    warn!(
                        "Batch {}/{} failed ({} records): {}",
                        batch.number,
                        batch.total_batches,
                        batch.len(),
                        failure
                    );
                    UploadOutcome::failed(batch.number, failure.to_string())
                }
            };

            self.progress.report_batch(&batch, outcome.success);
            tally.record(outcome, batch.len());

            if !batch.is_last() {
                self.enter(RunPhase::Pausing);
                self.pacer.pause().await;
            }
        }

        self.enter(RunPhase::Reporting);
        let report = tally.into_report(context);
        self.progress.finish(&report);
        info!(
            "Upload finished: {} succeeded, {} failed, {} total ({:.1}%)",
            HumanCount(report.success_count as u64),
            HumanCount(report.failure_count as u64),
            HumanCount(report.total as u64),
            report.success_rate
        );

        self.enter(RunPhase::Done);
        Ok(report)
    }

    async fn pre_clear(&self, encoder: &SqlBatchEncoder) -> Result<()> {
        warn!("Deleting all rows from '{}' before upload", encoder.table());

        let statement = encoder.encode_delete_all();
        let timeout = self.config.remote.clear_timeout();

        match self.transport.submit(&statement, timeout).await {
            Ok(()) => {
                info!("Cleared table '{}'", encoder.table());
                Ok(())
            }
            Err(failure) => {
                error!("Pre-clear failed, nothing will be uploaded: {}", failure);
                self.progress.finish_with_error(&failure.to_string());
                Err(Error::pre_clear(encoder.table(), failure.to_string()))
            }
        }
    }

    fn enter(&mut self, next: RunPhase) {
        debug!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
