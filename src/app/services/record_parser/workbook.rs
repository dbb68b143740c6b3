//! Spreadsheet row parsing for facility workbooks
//!
//! The workbook layer (`calamine`) only supplies cell tuples; everything
//! after that works on [`SheetCell`] rows so it can be tested without a
//! workbook file. Workbooks carry no region columns, so `sido` and `sigungu`
//! come from the first two tokens of the address.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::{debug, info};

use super::field_parsers::{parse_coordinate_pair, split_region};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{FacilityDraft, FacilityRecord, SkipReason, clean_text};
use crate::constants::workbook_columns as col;
use crate::{Error, Result};

/// A single spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl SheetCell {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Cell rendered as cleaned text
    ///
    /// Integral numbers drop the trailing `.0` so numeric postal codes read
    /// as `"06236"`-style strings rather than `"6236.0"`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => clean_text(text),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

impl From<&Data> for SheetCell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(text) => Self::Text(text.clone()),
            Data::Float(value) => Self::Number(*value),
            Data::Int(value) => Self::Number(*value as f64),
            Data::Bool(value) => Self::Bool(*value),
            other => Self::Text(other.to_string()),
        }
    }
}

/// Parser for the first worksheet of a workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookParser;

impl WorkbookParser {
    pub fn new() -> Self {
        Self
    }

    /// Open a workbook and parse its first worksheet
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        info!("Parsing workbook: {}", path.display());
        let source_name = path.display().to_string();

        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::source_read(&source_name, e.to_string()))?;

        if let Some(sheet_name) = workbook.sheet_names().first() {
            info!("Reading worksheet '{}'", sheet_name);
        }

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::source_read(&source_name, "workbook has no worksheets"))?
            .map_err(|e| Error::source_read(&source_name, e.to_string()))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(SheetCell::from).collect::<Vec<_>>());
        let result = parse_rows(rows);

        info!("{}", result.stats.summary());
        Ok(result)
    }
}

/// Parse row tuples, skipping the first row unconditionally
pub fn parse_rows<I>(rows: I) -> ParseResult
where
    I: IntoIterator<Item = Vec<SheetCell>>,
{
    let mut stats = ParseStats::new();
    let mut records = Vec::new();
    let mut rows = rows.into_iter();

    if let Some(header) = rows.next() {
        debug!(
            "Header: {:?}",
            header.iter().take(7).map(SheetCell::as_text).collect::<Vec<_>>()
        );
    }

    for (index, row) in rows.enumerate() {
        stats.record_row(index + 2, parse_row(&row), &mut records);
    }

    ParseResult::new(records, stats)
}

/// Parse one row of cells into a record or a skip reason
pub fn parse_row(row: &[SheetCell]) -> std::result::Result<FacilityRecord, SkipReason> {
    if row.first().is_none_or(SheetCell::is_empty) {
        return Err(SkipReason::EmptyLeadingCell);
    }

    let text = |index: usize| row.get(index).map(SheetCell::as_text).unwrap_or_default();

    let address = text(col::ADDRESS);
    let (sido, sigungu) = split_region(&address);
    let (latitude, longitude) = parse_coordinate_pair(&text(col::LATITUDE), &text(col::LONGITUDE));

    FacilityDraft {
        facility_type: text(col::FACILITY_TYPE),
        name: text(col::NAME),
        postal_code: text(col::POSTAL_CODE),
        address,
        phone: String::new(),
        latitude,
        longitude,
        sido,
        sigungu,
    }
    .into_record()
}
