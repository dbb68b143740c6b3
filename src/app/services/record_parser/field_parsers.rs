//! Field extraction helpers shared by the source parsers
//!
//! Coordinates are deliberately forgiving: an unusable token never rejects a
//! row, it resets the coordinate pair to `0.0`/`0.0`.

use crate::app::models::clean_text;

/// Cleaned field at `index`, or an empty string when the row is shorter
pub fn field_at(fields: &[String], index: usize) -> String {
    fields
        .get(index)
        .map(|value| clean_text(value))
        .unwrap_or_default()
}

/// Parse one coordinate token
///
/// Empty tokens read as `0.0`; non-numeric or non-finite tokens are `None`.
pub fn parse_coordinate(token: &str) -> Option<f64> {
    let trimmed = token.trim().trim_matches('"');
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a latitude/longitude pair, zeroing both if either is unusable
pub fn parse_coordinate_pair(latitude: &str, longitude: &str) -> (f64, f64) {
    match (parse_coordinate(latitude), parse_coordinate(longitude)) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => (0.0, 0.0),
    }
}

/// First two whitespace-separated address tokens as (sido, sigungu)
pub fn split_region(address: &str) -> (String, String) {
    let mut tokens = address.split_whitespace();
    let sido = tokens.next().unwrap_or_default().to_string();
    let sigungu = tokens.next().unwrap_or_default().to_string();
    (sido, sigungu)
}
