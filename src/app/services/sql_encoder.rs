//! SQL statement rendering for facility batches
//!
//! Statements travel as a single command-line argument to the remote CLI, so
//! values are inlined as literals rather than bound. Text is wrapped in single
//! quotes with embedded quotes doubled; coordinates are written with Rust's
//! shortest round-trip `Display`, which never uses exponent notation.

use std::fmt::Write;

use crate::app::models::FacilityRecord;
use crate::app::services::batch_planner::Batch;
use crate::constants::FACILITY_COLUMNS;

/// Renders INSERT and DELETE statements against one table
#[derive(Debug, Clone)]
pub struct SqlBatchEncoder {
    table: String,
}

impl SqlBatchEncoder {
    /// `table` must already be validated as a plain identifier
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// One multi-row INSERT covering every record of the batch
    pub fn encode_insert(&self, batch: &Batch<'_>) -> String {
        self.encode_records(batch.records)
    }

    /// One multi-row INSERT for an arbitrary record slice
    pub fn encode_records(&self, records: &[FacilityRecord]) -> String {
        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ",
            self.table,
            FACILITY_COLUMNS.join(", ")
        );

        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                sql.push_str(", ");
            }
            push_values_row(&mut sql, record);
        }

        sql
    }

    /// Statement that removes every row of the table
    pub fn encode_delete_all(&self) -> String {
        format!("DELETE FROM {}", self.table)
    }
}

fn push_values_row(sql: &mut String, record: &FacilityRecord) {
    // Writing into a String cannot fail
    let _ = write!(
        sql,
        "({}, {}, {}, {}, {}, {}, {}, {}, {})",
        escape_literal(record.facility_type()),
        escape_literal(record.name()),
        escape_literal(record.postal_code()),
        escape_literal(record.address()),
        escape_literal(record.phone()),
        record.latitude(),
        record.longitude(),
        escape_literal(record.sido()),
        escape_literal(record.sigungu()),
    );
}

/// Quote a text value as an SQL string literal
pub fn escape_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
