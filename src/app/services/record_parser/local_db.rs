//! Facility rows read back from a local SQLite database
//!
//! Used to push a locally prepared database to the remote store. NULL text
//! reads as an empty string and NULL or non-numeric coordinates as `0.0`;
//! rows still go through the same required-field validation as file rows.

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::info;

use super::field_parsers::parse_coordinate_pair;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::FacilityDraft;
use crate::constants::FACILITY_COLUMNS;
use crate::{Error, Result};

/// Reader for the facility table of a local SQLite file
#[derive(Debug, Clone)]
pub struct LocalDatabaseReader {
    table: String,
}

impl LocalDatabaseReader {
    /// `table` must already be validated as a plain identifier
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Read every facility row in `id` order
    pub fn read_file(&self, path: &Path) -> Result<ParseResult> {
        info!("Reading local database: {}", path.display());

        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| Error::source_read(path.display().to_string(), e.to_string()))?;

        let result = self.read_connection(&connection)?;
        info!("{}", result.stats.summary());
        Ok(result)
    }

    /// Read facility rows from an open connection
    pub fn read_connection(&self, connection: &Connection) -> Result<ParseResult> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            FACILITY_COLUMNS.join(", "),
            self.table
        );

        let mut statement = connection
            .prepare(&sql)
            .map_err(|e| Error::local_database(format!("Failed to query {}", self.table), e))?;

        let rows = statement
            .query_map([], |row| {
                (0..FACILITY_COLUMNS.len())
                    .map(|index| row.get::<_, Value>(index))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(|e| Error::local_database(format!("Failed to read {}", self.table), e))?;

        let mut stats = ParseStats::new();
        let mut records = Vec::new();

        for (index, row) in rows.enumerate() {
            let values = row.map_err(|e| {
                Error::local_database(format!("Failed to decode row {}", index + 1), e)
            })?;
            stats.record_row(index + 1, draft_from_values(&values).into_record(), &mut records);
        }

        Ok(ParseResult::new(records, stats))
    }
}

/// Build a draft from values in [`FACILITY_COLUMNS`] order
fn draft_from_values(values: &[Value]) -> FacilityDraft {
    let text = |index: usize| values.get(index).map(value_text).unwrap_or_default();
    let (latitude, longitude) = parse_coordinate_pair(&text(5), &text(6));

    FacilityDraft {
        facility_type: text(0),
        name: text(1),
        postal_code: text(2),
        address: text(3),
        phone: text(4),
        latitude,
        longitude,
        sido: text(7),
        sigungu: text(8),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Blob(_) => String::new(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => text.clone(),
    }
}
