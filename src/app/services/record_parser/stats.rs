//! Parsing statistics and result structures for facility sources
//!
//! This module provides types for tracking how many source rows became
//! records, why the rest were skipped, and the parsed record sequence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::app::models::{FacilityRecord, SkipReason};
use crate::constants::MAX_RECORDED_SKIPS;

/// Parsing result with records and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Valid records in source order
    pub records: Vec<FacilityRecord>,

    /// Parsing statistics
    pub stats: ParseStats,

    /// Encoding used to decode the source, for text sources
    pub encoding: Option<String>,
}

impl ParseResult {
    pub fn new(records: Vec<FacilityRecord>, stats: ParseStats) -> Self {
        Self {
            records,
            stats,
            encoding: None,
        }
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Row-level parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Data rows encountered, header excluded
    pub total_rows: usize,

    /// Rows that became records
    pub records_parsed: usize,

    /// Rows that were skipped
    pub rows_skipped: usize,

    /// Skip counts keyed by [`SkipReason::kind`]
    pub skipped_by_reason: BTreeMap<String, usize>,

    /// First skip messages, for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row's result into the statistics and the record list
    pub fn record_row(
        &mut self,
        row_number: usize,
        result: Result<FacilityRecord, SkipReason>,
        records: &mut Vec<FacilityRecord>,
    ) {
        self.total_rows += 1;

        match result {
            Ok(record) => {
                self.records_parsed += 1;
                records.push(record);
            }
            Err(reason) => {
                self.rows_skipped += 1;
                *self
                    .skipped_by_reason
                    .entry(reason.kind().to_string())
                    .or_insert(0) += 1;

                debug!("Skipped row {}: {}", row_number, reason);
                if self.errors.len() < MAX_RECORDED_SKIPS {
                    self.errors.push(format!("Row {}: {}", row_number, reason));
                }
            }
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Count of skips for one reason kind
    pub fn skipped(&self, kind: &str) -> usize {
        self.skipped_by_reason.get(kind).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> String {
        let reasons = self
            .skipped_by_reason
            .iter()
            .map(|(kind, count)| format!("{}={}", kind, count))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{} of {} rows parsed ({:.1}%), {} skipped{}",
            self.records_parsed,
            self.total_rows,
            self.success_rate(),
            self.rows_skipped,
            if reasons.is_empty() {
                String::new()
            } else {
                format!(" [{}]", reasons)
            }
        )
    }
}
