//! Run accounting and the final upload report

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::app::models::UploadOutcome;
use crate::app::services::record_parser::ParseStats;

/// Running success and failure counts for one upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTally {
    total: usize,
    batches_total: usize,
    success_count: usize,
    failure_count: usize,
    failed_batches: Vec<UploadOutcome>,
}

impl UploadTally {
    pub fn new(total: usize, batches_total: usize) -> Self {
        Self {
            total,
            batches_total,
            success_count: 0,
            failure_count: 0,
            failed_batches: Vec::new(),
        }
    }

    /// Count a batch outcome; a failed batch counts all of its records
    pub fn record(&mut self, outcome: UploadOutcome, batch_len: usize) {
        if outcome.success {
            self.success_count += batch_len;
        } else {
            self.failure_count += batch_len;
            self.failed_batches.push(outcome);
        }
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    /// Close the tally into a report
    pub fn into_report(self, context: ReportContext) -> UploadReport {
        UploadReport {
            source: context.source,
            encoding: context.encoding,
            table: context.table,
            replaced: context.replaced,
            total: self.total,
            success_count: self.success_count,
            failure_count: self.failure_count,
            success_rate: success_rate(self.success_count, self.total),
            batches_total: self.batches_total,
            batches_failed: self.failed_batches.len(),
            failed_batches: self.failed_batches,
            parse_stats: context.parse_stats,
            started_at: context.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Run details carried into the report alongside the counts
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub source: String,
    pub encoding: Option<String>,
    pub table: String,
    pub replaced: bool,
    pub parse_stats: ParseStats,
    pub started_at: DateTime<Utc>,
}

/// Final report of one upload run
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub source: String,
    pub encoding: Option<String>,
    pub table: String,
    /// Whether the table was cleared before uploading
    pub replaced: bool,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// `success_count / total * 100`
    pub success_rate: f64,
    pub batches_total: usize,
    pub batches_failed: usize,
    pub failed_batches: Vec<UploadOutcome>,
    pub parse_stats: ParseStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl UploadReport {
    pub fn is_complete_success(&self) -> bool {
        self.failure_count == 0
    }

    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }
}

fn success_rate(success: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        success as f64 / total as f64 * 100.0
    }
}
