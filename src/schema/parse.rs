//! Cell-level parsing of dates, numbers and labels.

use crate::core::Cell;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%d-%m-%Y", "%b %d, %Y", "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

/// Parse a calendar date; timestamps keep only their date part.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    let text = match cell {
        Cell::Text(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    let date = parse_date_text(text)?;
    if (1900..=2200).contains(&date.year()) {
        Some(date)
    } else {
        None
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(text, "%Y%m%d").ok();
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a finite number, tolerating currency symbols, thousands
/// separators, percent signs and accounting-style parentheses.
pub fn parse_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) if v.is_finite() => Some(*v),
        Cell::Text(s) => parse_number_text(s),
        _ => None,
    }
}

fn parse_number_text(text: &str) -> Option<f64> {
    let mut text = text.trim();
    let mut negative = false;
    if text.starts_with('(') && text.ends_with(')') && text.len() > 2 {
        negative = true;
        text = &text[1..text.len() - 1];
    }

    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != ',' && *c != '_' && *c != ' ')
        .collect();
    if cleaned.is_empty() || !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Text of a label cell, `None` when blank.
pub fn parse_label(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Cell::Number(v) if v.is_finite() => Some(v.to_string()),
        _ => None,
    }
}

/// Normalise a header: trimmed, lowercase, spaces and hyphens as `_`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
