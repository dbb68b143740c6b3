//! Core data models for facility sync
//!
//! This module contains the record type moved between source and destination,
//! the reasons a source row can be rejected, and the per-batch upload result.

use serde::{Deserialize, Serialize};

/// A single facility as written to the destination table
///
/// Records are immutable once constructed. The only way to build one is
/// through [`FacilityDraft::into_record`], which enforces that `name`,
/// `address`, `sido` and `sigungu` are non-empty and that both coordinates
/// are finite numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRecord {
    facility_type: String,
    name: String,
    postal_code: String,
    address: String,
    phone: String,
    latitude: f64,
    longitude: f64,
    sido: String,
    sigungu: String,
}

impl FacilityRecord {
    pub fn facility_type(&self) -> &str {
        &self.facility_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn sido(&self) -> &str {
        &self.sido
    }

    pub fn sigungu(&self) -> &str {
        &self.sigungu
    }

    /// Whether the record carries a real coordinate pair
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }
}

/// Unvalidated field values extracted from one source row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityDraft {
    pub facility_type: String,
    pub name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub sido: String,
    pub sigungu: String,
}

impl FacilityDraft {
    /// Trim every text field and check required fields
    ///
    /// Non-finite coordinates collapse to `0.0`; coordinates never cause a
    /// rejection.
    pub fn into_record(self) -> Result<FacilityRecord, SkipReason> {
        let record = FacilityRecord {
            facility_type: clean_text(&self.facility_type),
            name: clean_text(&self.name),
            postal_code: clean_text(&self.postal_code),
            address: clean_text(&self.address),
            phone: clean_text(&self.phone),
            latitude: finite_or_zero(self.latitude),
            longitude: finite_or_zero(self.longitude),
            sido: clean_text(&self.sido),
            sigungu: clean_text(&self.sigungu),
        };

        for (field, value) in [
            ("name", &record.name),
            ("address", &record.address),
            ("sido", &record.sido),
            ("sigungu", &record.sigungu),
        ] {
            if value.is_empty() {
                return Err(SkipReason::MissingField(field));
            }
        }

        Ok(record)
    }
}

/// Trim surrounding whitespace and literal double quotes
pub fn clean_text(value: &str) -> String {
    value.trim().trim_matches('"').to_string()
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Why a source row did not become a record
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("blank line")]
    BlankLine,

    #[error("only {found} fields, at least {required} required")]
    TooFewFields { found: usize, required: usize },

    #[error("leading cell is empty")]
    EmptyLeadingCell,

    #[error("required field '{0}' is empty")]
    MissingField(&'static str),
}

impl SkipReason {
    /// Stable short name used as a statistics key
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BlankLine => "blank_line",
            Self::TooFewFields { .. } => "too_few_fields",
            Self::EmptyLeadingCell => "empty_leading_cell",
            Self::MissingField(_) => "missing_field",
        }
    }
}

/// Result of submitting one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// 1-based batch number
    pub batch_number: usize,
    pub success: bool,
    /// Records applied by the destination: the batch size or zero
    pub applied: usize,
    /// Bounded diagnostic for failed batches
    pub diagnostic: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded(batch_number: usize, batch_size: usize) -> Self {
        Self {
            batch_number,
            success: true,
            applied: batch_size,
            diagnostic: None,
        }
    }

    /// `diagnostic` is stored as given; transports bound their own detail text
    pub fn failed(batch_number: usize, diagnostic: impl Into<String>) -> Self {
        Self {
            batch_number,
            success: false,
            applied: 0,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> FacilityDraft {
        FacilityDraft {
            facility_type: "요양원".to_string(),
            name: " 행복요양원 ".to_string(),
            postal_code: "\"06236\"".to_string(),
            address: "서울특별시 강남구 테헤란로 1".to_string(),
            phone: "02-123-4567".to_string(),
            latitude: 37.5,
            longitude: 127.03,
            sido: "서울특별시".to_string(),
            sigungu: "강남구".to_string(),
        }
    }

    #[test]
    fn test_into_record_trims_whitespace_and_quotes() {
        let record = draft().into_record().unwrap();
        assert_eq!(record.name(), "행복요양원");
        assert_eq!(record.postal_code(), "06236");
        assert!(record.has_coordinates());
    }

    #[test]
    fn test_into_record_rejects_each_required_field() {
        let cases: [(&'static str, fn(&mut FacilityDraft)); 4] = [
            ("name", |d| d.name = "  ".to_string()),
            ("address", |d| d.address = String::new()),
            ("sido", |d| d.sido = "\"\"".to_string()),
            ("sigungu", |d| d.sigungu = String::new()),
        ];

        for (field, blank) in cases {
            let mut d = draft();
            blank(&mut d);
            assert_eq!(d.into_record(), Err(SkipReason::MissingField(field)));
        }
    }

    #[test]
    fn test_optional_fields_may_be_empty() {
        let mut d = draft();
        d.facility_type.clear();
        d.postal_code.clear();
        d.phone.clear();
        assert!(d.into_record().is_ok());
    }

    #[test]
    fn test_non_finite_coordinates_become_zero() {
        let mut d = draft();
        d.latitude = f64::NAN;
        d.longitude = f64::INFINITY;
        let record = d.into_record().unwrap();
        assert_eq!(record.latitude(), 0.0);
        assert_eq!(record.longitude(), 0.0);
        assert!(!record.has_coordinates());
    }

    #[test]
    fn test_failed_outcome_keeps_diagnostic() {
        let outcome = UploadOutcome::failed(4, "command exited with status 1: boom");
        assert!(!outcome.success);
        assert_eq!(outcome.applied, 0);
        assert_eq!(
            outcome.diagnostic.as_deref(),
            Some("command exited with status 1: boom")
        );
    }

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("boom", 200), "boom");
        assert_eq!(excerpt("", 3), "");
    }
}
