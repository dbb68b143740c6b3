//! Quote-aware field splitting for delimited facility lines
//!
//! This is a single-pass, two-state scanner rather than a full CSV grammar.
//! A double quote always toggles between the outside and inside states and
//! is never emitted, so doubled quotes (`""`) inside a quoted field are not
//! treated as an escaped literal quote.

/// Scanner position relative to a quoted section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

impl ScanState {
    fn toggled(self) -> Self {
        match self {
            Self::Outside => Self::Inside,
            Self::Inside => Self::Outside,
        }
    }
}

/// Split one line into fields on commas that are not inside quotes
///
/// Always returns at least one field; an empty line yields `[""]`.
pub fn split_quoted_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::Outside;

    for ch in line.chars() {
        match (ch, state) {
            ('"', _) => state = state.toggled(),
            (',', ScanState::Outside) => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields
}
