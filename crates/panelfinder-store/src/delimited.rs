//! Delimited text (CSV, semicolon- and tab-separated) reader.

use std::path::Path;

use panelfinder_core::FieldValue;

use crate::StoreError;
use crate::sheet::Table;

const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const SNIFF_LINES: usize = 10;

pub(crate) fn read(path: &Path) -> Result<Table, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Excel exports are not always UTF-8; keep going with replacement chars.
    let content = String::from_utf8_lossy(&bytes);
    parse(content.trim_start_matches('\u{feff}'))
}

pub(crate) fn parse(content: &str) -> Result<Table, StoreError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(type_cell).collect());
    }
    Ok(Table { headers, rows })
}

/// Pick the delimiter giving the most consistent multi-column split of the
/// first lines. Falls back to a comma.
fn sniff_delimiter(content: &str) -> u8 {
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for delim in CANDIDATES {
        let counts: Vec<usize> = lines.iter().map(|line| field_count(line, delim)).collect();
        let Some(&target) = counts.first() else {
            break;
        };
        if target <= 1 {
            continue;
        }
        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

fn field_count(line: &str, delim: u8) -> usize {
    ::csv::ReaderBuilder::new()
        .delimiter(delim)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map_or(1, |r| r.len())
}

/// Type a raw cell the way a spreadsheet reader would: empty → `None`,
/// plain numbers → `Number`, anything else stays text.
fn type_cell(raw: &str) -> Option<FieldValue> {
    if raw.is_empty() {
        return None;
    }
    let trimmed = raw.trim();
    // "0612" is a code, not the number 612
    let leading_zero = trimmed.len() > 1
        && trimmed.starts_with('0')
        && trimmed.as_bytes()[1].is_ascii_digit();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && !leading_zero => Some(FieldValue::Number(n)),
        _ => Some(FieldValue::Text(raw.to_string())),
    }
}
