//! Display formatting shared by every view: file sizes and dates.

use chrono::{DateTime, Utc};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human file size with binary units (e.g. "0 B", "1.5 KB", "2 MB").
///
/// One decimal above bytes, with a trailing ".0" dropped.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // Rounding may carry into the next unit (1023.96 KB -> "1024 KB").
    if format!("{:.1}", value) == "1024.0" && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let number = format!("{:.1}", value);
    let number = number.strip_suffix(".0").unwrap_or(&number);
    format!("{} {}", number, UNITS[unit])
}

/// Folders have no size; they render as a dash.
pub fn format_optional_size(bytes: Option<u64>) -> String {
    bytes.map(format_size).unwrap_or_else(|| "-".to_string())
}

/// ISO calendar date (YYYY-MM-DD).
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// "3 days ago" style text, measured against `now`. Future instants read as "now".
pub fn format_relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at).to_std().unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}
