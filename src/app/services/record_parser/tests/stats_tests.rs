//! Tests for parsing statistics

use super::super::stats::ParseStats;
use crate::app::models::SkipReason;
use crate::constants::MAX_RECORDED_SKIPS;

#[test]
fn test_parse_stats_counts_skips_by_reason() {
    let mut stats = ParseStats::new();
    let mut records = Vec::new();

    stats.record_row(2, Err(SkipReason::BlankLine), &mut records);
    stats.record_row(3, Err(SkipReason::MissingField("name")), &mut records);
    stats.record_row(4, Err(SkipReason::MissingField("sido")), &mut records);

    assert_eq!(stats.total_rows, 3);
    assert_eq!(stats.rows_skipped, 3);
    assert_eq!(stats.records_parsed, 0);
    assert_eq!(stats.skipped("missing_field"), 2);
    assert_eq!(stats.skipped("blank_line"), 1);
    assert_eq!(stats.skipped("too_few_fields"), 0);
    assert_eq!(stats.errors[1], "Row 3: required field 'name' is empty");
    assert!(records.is_empty());
}

#[test]
fn test_parse_stats_empty() {
    let stats = ParseStats::new();
    assert_eq!(stats.total_rows, 0);
    assert_eq!(stats.success_rate(), 0.0);
    assert_eq!(stats.summary(), "0 of 0 rows parsed (0.0%), 0 skipped");
}

#[test]
fn test_error_messages_are_bounded() {
    let mut stats = ParseStats::new();
    let mut records = Vec::new();

    for row in 0..(MAX_RECORDED_SKIPS + 20) {
        stats.record_row(row, Err(SkipReason::EmptyLeadingCell), &mut records);
    }

    assert_eq!(stats.rows_skipped, MAX_RECORDED_SKIPS + 20);
    assert_eq!(stats.errors.len(), MAX_RECORDED_SKIPS);
}

#[test]
fn test_summary_lists_reasons() {
    let mut stats = ParseStats::new();
    let mut records = Vec::new();
    stats.record_row(
        2,
        Err(SkipReason::TooFewFields {
            found: 3,
            required: 9,
        }),
        &mut records,
    );

    assert_eq!(
        stats.summary(),
        "0 of 1 rows parsed (0.0%), 1 skipped [too_few_fields=1]"
    );
}
