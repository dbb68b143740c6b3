//! Test utilities for facility record parsing
//!
//! Provides sample lines, files and rows shared across the parser test
//! modules.

use std::io::Write;
use tempfile::NamedTempFile;

use super::workbook::SheetCell;

mod stats_tests;

pub const HEADER_LINE: &str = "ID,시설유형,시설명,우편번호,주소,전화번호,위도,경도,시도,시군구";

/// A complete, valid delimited data line
pub fn valid_line(id: usize, name: &str) -> String {
    format!(
        "{},요양원,{},06236,\"서울특별시 강남구 테헤란로 {}\",02-555-{:04},37.4981,127.0276,서울특별시,강남구",
        id, name, id, id
    )
}

/// Delimited text content with a header and the given data lines
pub fn delimited_content(lines: &[String]) -> String {
    let mut content = String::from(HEADER_LINE);
    for line in lines {
        content.push('\n');
        content.push_str(line);
    }
    content.push('\n');
    content
}

/// Write raw bytes to a temporary file
pub fn create_temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(bytes).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

pub fn text(value: &str) -> SheetCell {
    SheetCell::Text(value.to_string())
}

/// A valid workbook row: type, name, postal code, address, lat, lng
pub fn workbook_row(name: &str, address: &str) -> Vec<SheetCell> {
    vec![
        text("주야간보호"),
        text(name),
        SheetCell::Number(48058.0),
        text(address),
        SheetCell::Number(35.1631),
        SheetCell::Number(129.1636),
    ]
}

pub fn workbook_header() -> Vec<SheetCell> {
    ["시설유형", "시설명", "우편번호", "주소", "위도", "경도"]
        .iter()
        .map(|value| text(value))
        .collect()
}
