//! Facility record parsing from text, workbook and local database sources
//!
//! Every source produces the same output: an ordered sequence of validated
//! [`FacilityRecord`](crate::app::models::FacilityRecord)s plus
//! [`ParseStats`]. Each row is parsed into an explicit
//! `Result<FacilityRecord, SkipReason>`, so a malformed row is counted and
//! skipped and never aborts the run.
//!
//! ## Architecture
//!
//! - [`splitter`] - Two-state quote-aware field scanner
//! - [`field_parsers`] - Positional field, coordinate and region helpers
//! - [`delimited`] - Delimited text lines (with encoding detection)
//! - [`workbook`] - Spreadsheet rows
//! - [`local_db`] - Rows from a local SQLite facility table
//! - [`source`] - Source selection
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use facility_sync::app::services::record_parser::delimited::parse_text;
//!
//! let text = "ID,시설유형,시설명,우편번호,주소,전화,위도,경도,시도,시군구\n\
//!             1,요양원,행복요양원,06236,서울특별시 강남구 테헤란로 1,02-123-4567,37.5,127.0,서울특별시,강남구\n";
//! let result = parse_text(text);
//! assert_eq!(result.records.len(), 1);
//! ```

pub mod delimited;
pub mod field_parsers;
pub mod local_db;
pub mod source;
pub mod splitter;
pub mod stats;
pub mod workbook;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use delimited::DelimitedTextParser;
pub use local_db::LocalDatabaseReader;
pub use source::RecordSource;
pub use splitter::split_quoted_fields;
pub use stats::{ParseResult, ParseStats};
pub use workbook::{SheetCell, WorkbookParser};
