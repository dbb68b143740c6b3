//! Tests for the upload orchestrator and its reporting

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::app::models::{FacilityDraft, FacilityRecord};
use crate::app::services::remote_transport::{Transport, TransportFailure, TransportOutcome};
use crate::config::Config;

use super::pacing::Pacer;


/// In-memory transport that records statements and fails chosen submissions
#[derive(Debug, Default)]
pub struct RecordingTransport {
    statements: Mutex<Vec<String>>,
    timeouts: Mutex<Vec<Duration>>,
    /// 1-based submission numbers that fail
    failing: HashSet<usize>,
    fail_all: bool,
    stderr: Option<String>,
}

impl RecordingTransport {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_on(submissions: &[usize]) -> Self {
        Self {
            failing: submissions.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Fails every submission with the given stderr text
    pub fn failing_with_stderr(stderr: &str) -> Self {
        Self {
            fail_all: true,
            stderr: Some(stderr.to_string()),
            ..Self::default()
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn submit(&self, statement: &str, timeout: Duration) -> TransportOutcome {
        let submission = {
            let mut statements = self.statements.lock().unwrap();
            statements.push(statement.to_string());
            statements.len()
        };
        self.timeouts.lock().unwrap().push(timeout);

        if self.fail_all || self.failing.contains(&submission) {
            Err(TransportFailure::non_zero_exit(
                Some(1),
                self.stderr
                    .as_deref()
                    .unwrap_or("✘ [ERROR] A request to the Cloudflare API failed."),
            ))
        } else {
            Ok(())
        }
    }
}

/// Pacer that counts pauses without sleeping
#[derive(Debug, Default)]
pub struct CountingPacer {
    pauses: AtomicUsize,
}

impl CountingPacer {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::Relaxed)
    }
}

impl Pacer for &CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn facility(index: usize) -> FacilityRecord {
    FacilityDraft {
        facility_type: "요양원".to_string(),
        name: format!("시설 {}", index),
        postal_code: "06236".to_string(),
        address: format!("서울특별시 강남구 테헤란로 {}", index),
        phone: String::new(),
        latitude: 37.4981,
        longitude: 127.0276,
        sido: "서울특별시".to_string(),
        sigungu: "강남구".to_string(),
    }
    .into_record()
    .unwrap()
}

pub fn facilities(count: usize) -> Vec<FacilityRecord> {
    (1..=count).map(facility).collect()
}

pub fn config_with_batch_size(batch_size: usize) -> Config {
    let mut config = Config::default();
    config.upload.batch_size = batch_size;
    config
}
