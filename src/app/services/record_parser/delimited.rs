//! Delimited text parsing for facility exports
//!
//! Fields are positional: 0 is the source row id (ignored), then
//! facility_type, name, postal_code, address, phone, latitude, longitude,
//! sido and sigungu. The first line is the header.

use std::path::Path;
use tracing::{debug, info};

use super::field_parsers::{field_at, parse_coordinate_pair};
use super::splitter::split_quoted_fields;
use super::stats::{ParseResult, ParseStats};
use crate::Result;
use crate::app::models::{FacilityDraft, FacilityRecord, SkipReason};
use crate::app::services::encoding_resolver::EncodingResolver;
use crate::constants::MIN_DELIMITED_FIELDS;
use crate::constants::delimited_columns as col;

/// Parser for encoding-uncertain delimited text files
#[derive(Debug, Clone)]
pub struct DelimitedTextParser {
    resolver: EncodingResolver,
}

impl DelimitedTextParser {
    pub fn new(resolver: EncodingResolver) -> Self {
        Self { resolver }
    }

    /// Read, decode and parse a delimited text file
    pub fn parse_file(&self, path: &Path) -> Result<ParseResult> {
        info!("Parsing delimited text file: {}", path.display());

        let decoded = self.resolver.read_to_string(path)?;
        let result = parse_text(&decoded.text).with_encoding(decoded.encoding_label);

        info!("{}", result.stats.summary());
        Ok(result)
    }
}

/// Parse already-decoded text, skipping the header line
pub fn parse_text(text: &str) -> ParseResult {
    let mut stats = ParseStats::new();
    let mut records = Vec::new();
    let mut lines = text.lines();

    if let Some(header) = lines.next() {
        debug!("Header: {}", header.trim());
    }

    for (index, line) in lines.enumerate() {
        // Line 1 is the header
        let line_number = index + 2;
        stats.record_row(line_number, parse_line(line), &mut records);
    }

    ParseResult::new(records, stats)
}

/// Parse one data line into a record or a skip reason
pub fn parse_line(line: &str) -> std::result::Result<FacilityRecord, SkipReason> {
    let line = line.trim();
    if line.is_empty() {
        return Err(SkipReason::BlankLine);
    }

    let fields = split_quoted_fields(line);
    if fields.len() < MIN_DELIMITED_FIELDS {
        return Err(SkipReason::TooFewFields {
            found: fields.len(),
            required: MIN_DELIMITED_FIELDS,
        });
    }

    let (latitude, longitude) =
        parse_coordinate_pair(&field_at(&fields, col::LATITUDE), &field_at(&fields, col::LONGITUDE));

    FacilityDraft {
        facility_type: field_at(&fields, col::FACILITY_TYPE),
        name: field_at(&fields, col::NAME),
        postal_code: field_at(&fields, col::POSTAL_CODE),
        address: field_at(&fields, col::ADDRESS),
        phone: field_at(&fields, col::PHONE),
        latitude,
        longitude,
        sido: field_at(&fields, col::SIDO),
        sigungu: field_at(&fields, col::SIGUNGU),
    }
    .into_record()
}
