//! Source selection for a sync run

use std::fmt;
use std::path::{Path, PathBuf};

use super::delimited::DelimitedTextParser;
use super::local_db::LocalDatabaseReader;
use super::stats::ParseResult;
use super::workbook::WorkbookParser;
use crate::Result;
use crate::app::services::encoding_resolver::EncodingResolver;
use crate::config::Config;

/// Where facility records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// Comma-delimited text in an uncertain encoding
    DelimitedText(PathBuf),
    /// First worksheet of an xlsx/xls/ods workbook
    Workbook(PathBuf),
    /// Facility table of a local SQLite database
    LocalDatabase(PathBuf),
}

impl RecordSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::DelimitedText(path) | Self::Workbook(path) | Self::LocalDatabase(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::DelimitedText(_) => "delimited text",
            Self::Workbook(_) => "workbook",
            Self::LocalDatabase(_) => "local database",
        }
    }

    /// Read and parse the source into records
    pub fn load(&self, config: &Config) -> Result<ParseResult> {
        match self {
            Self::DelimitedText(path) => {
                let resolver = EncodingResolver::from_config(&config.source)?;
                DelimitedTextParser::new(resolver).parse_file(path)
            }
            Self::Workbook(path) => WorkbookParser::new().parse_file(path),
            Self::LocalDatabase(path) => {
                LocalDatabaseReader::new(config.upload.table.as_str()).read_file(path)
            }
        }
    }
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.path().display())
    }
}
