//! Character encoding detection for delimited text sources
//!
//! Korean facility exports arrive as UTF-8, UTF-8 with BOM, or one of the
//! legacy EUC-KR/CP949 code pages. The resolver decodes a short probe under
//! each candidate encoding and picks the first one whose probe contains a
//! known header keyword. Malformed byte sequences are replaced, never fatal,
//! and the file is read from disk exactly once.

use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::{Error, Result};

/// A configured encoding together with the label it was requested by
#[derive(Debug, Clone)]
pub struct EncodingCandidate {
    pub label: String,
    pub encoding: &'static Encoding,
}

impl EncodingCandidate {
    /// Resolve a label such as `utf-8`, `cp949` or `euc-kr`
    pub fn from_label(label: &str) -> Result<Self> {
        let encoding = lookup_encoding(label)
            .ok_or_else(|| Error::configuration(format!("Unknown text encoding '{}'", label)))?;
        Ok(Self {
            label: label.trim().to_ascii_lowercase(),
            encoding,
        })
    }
}

/// Map a user-facing label to an `encoding_rs` encoding
///
/// Adds the Windows code page aliases that the WHATWG label table lacks.
pub fn lookup_encoding(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "cp949" | "ms949" | "uhc" => Encoding::for_label(b"windows-949"),
        "utf-8-sig" | "utf8-sig" => Some(UTF_8),
        other => Encoding::for_label(other.as_bytes()),
    }
}

/// Which encoding was chosen for a file and why
#[derive(Debug, Clone)]
pub struct Resolution {
    pub candidate: EncodingCandidate,
    /// False when no probe matched and the fallback was used
    pub matched_marker: bool,
}

/// Fully decoded file content
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
    pub matched_marker: bool,
    /// Whether any malformed sequence was replaced during the full decode
    pub had_replacements: bool,
}

/// Probes candidate encodings against the head of a file
#[derive(Debug, Clone)]
pub struct EncodingResolver {
    candidates: Vec<EncodingCandidate>,
    fallback: EncodingCandidate,
    markers: Vec<String>,
    probe_lines: usize,
}

impl EncodingResolver {
    pub fn new(
        candidate_labels: &[String],
        fallback_label: &str,
        markers: Vec<String>,
        probe_lines: usize,
    ) -> Result<Self> {
        let candidates = candidate_labels
            .iter()
            .map(|label| EncodingCandidate::from_label(label))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            candidates,
            fallback: EncodingCandidate::from_label(fallback_label)?,
            markers,
            probe_lines: probe_lines.max(1),
        })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        Self::new(
            &config.encodings,
            &config.fallback_encoding,
            config.header_markers.clone(),
            config.probe_lines,
        )
    }

    /// Pick an encoding for raw file bytes
    pub fn resolve(&self, bytes: &[u8]) -> Resolution {
        let probe = probe_bytes(bytes, self.probe_lines);

        for candidate in &self.candidates {
            let (text, had_errors) = candidate.encoding.decode_with_bom_removal(probe);
            debug!(
                "Probe under {}: {:?} (malformed: {})",
                candidate.label,
                text.chars().take(40).collect::<String>(),
                had_errors
            );

            if self.markers.iter().any(|marker| text.contains(marker.as_str())) {
                if had_errors {
                    warn!(
                        "Encoding {} matched a header marker but the probe contained malformed bytes",
                        candidate.label
                    );
                }
                return Resolution {
                    candidate: candidate.clone(),
                    matched_marker: true,
                };
            }
        }

        warn!(
            "No candidate encoding matched a header marker, falling back to {}",
            self.fallback.label
        );
        Resolution {
            candidate: self.fallback.clone(),
            matched_marker: false,
        }
    }

    /// Decode bytes with the resolved encoding
    pub fn decode(&self, bytes: &[u8]) -> DecodedText {
        let resolution = self.resolve(bytes);
        let (text, had_replacements) = resolution
            .candidate
            .encoding
            .decode_with_bom_removal(bytes);

        DecodedText {
            text: text.into_owned(),
            encoding_label: resolution.candidate.label,
            matched_marker: resolution.matched_marker,
            had_replacements,
        }
    }

    /// Read a file once and decode it with the resolved encoding
    pub fn read_to_string(&self, path: &Path) -> Result<DecodedText> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::source_read(path.display().to_string(), e.to_string()))?;

        let decoded = self.decode(&bytes);
        info!(
            "Decoded {} ({} bytes) as {}",
            path.display(),
            bytes.len(),
            decoded.encoding_label
        );
        Ok(decoded)
    }
}

/// Leading bytes covering the first `lines` lines
fn probe_bytes(bytes: &[u8], lines: usize) -> &[u8] {
    let mut seen = 0;
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b'\n' {
            seen += 1;
            if seen == lines {
                return &bytes[..=index];
            }
        }
    }
    bytes
}
