//! Per-batch progress lines and the upload progress bar

use std::io::{self, Write};

use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::report::UploadReport;
use crate::app::services::batch_planner::Batch;

/// Progress reporter for batch uploads
///
/// When no bar is set up, progress lines go to the debug log instead. A bar
/// that indicatif hides (stderr is not a terminal) cannot print, so its lines
/// go to the line writer, stderr unless replaced.
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    line_writer: Box<dyn Write + Send + Sync>,
    total_batches: usize,
}

impl ProgressReporter {
    /// Create a reporter with no visible bar
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            line_writer: Box::new(io::stderr()),
            total_batches: 0,
        }
    }

    /// Send progress lines of a hidden bar to `writer` instead of stderr
    pub fn with_line_writer(mut self, writer: impl Write + Send + Sync + 'static) -> Self {
        self.line_writer = Box::new(writer);
        self
    }

    /// Show a bar sized to the number of batches
    pub fn setup_progress(&mut self, total_batches: usize) {
        self.attach_bar(ProgressBar::new(total_batches as u64), total_batches);
    }

    pub(crate) fn attach_bar(&mut self, pb: ProgressBar, total_batches: usize) {
        self.total_batches = total_batches;
        pb.set_length(total_batches as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} batches | {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  ")),
            Err(e) => debug!("Falling back to default progress style: {}", e),
        }
        pb.set_message("Uploading");

        self.progress_bar = Some(pb);
    }

    /// Record one finished batch
    pub fn report_batch(&mut self, batch: &Batch<'_>, success: bool) {
        let line = format_progress_line(batch, success);
        let Some(pb) = self.progress_bar.clone() else {
            debug!("{}", line);
            return;
        };

        if pb.is_hidden() {
            if let Err(e) = writeln!(self.line_writer, "{}", line) {
                debug!("Failed to write progress line: {}", e);
            }
        } else {
            pb.println(&line);
        }
        pb.inc(1);
        pb.set_message(format!(
            "{}/{} records",
            HumanCount(batch.processed_through() as u64),
            HumanCount(batch.total_records as u64)
        ));
    }

    pub fn finish(&self, report: &UploadReport) {
        let message = format!(
            "Completed: {} uploaded, {} failed",
            HumanCount(report.success_count as u64),
            HumanCount(report.failure_count as u64)
        );
        match &self.progress_bar {
            Some(pb) => pb.finish_with_message(message),
            None => info!("{}", message),
        }
    }

    pub fn finish_with_error(&self, error_message: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.abandon_with_message(format!("Failed: {}", error_message));
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.progress_bar.is_some()
    }

    pub fn total_batches(&self) -> usize {
        self.total_batches
    }

    pub fn current_position(&self) -> u64 {
        self.progress_bar.as_ref().map_or(0, ProgressBar::position)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = &self.progress_bar {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}

/// `[  3/188]   300/18,708 (  1.6%) ✅`
///
/// Batch numbers pad to the width of the batch total and record counts to
/// the digit count of the record total.
pub fn format_progress_line(batch: &Batch<'_>, success: bool) -> String {
    let total_batches = batch.total_batches.to_string();
    let total_records = HumanCount(batch.total_records as u64).to_string();

    format!(
        "[{:>batch_width$}/{}] {:>count_width$}/{} ({:5.1}%) {}",
        batch.number,
        total_batches,
        HumanCount(batch.processed_through() as u64).to_string(),
        total_records,
        batch.percent_complete(),
        if success { "✅" } else { "❌" },
        batch_width = total_batches.len(),
        count_width = batch.total_records.to_string().len(),
    )
}
