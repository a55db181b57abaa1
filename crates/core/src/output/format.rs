//! Human-readable sizes and savings.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with base-1024 units and up to two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{:.2}", value);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Formats the size reduction from `original` to `converted` as a percentage
/// with one decimal.
pub fn format_savings(original: u64, converted: u64) -> String {
    if original == 0 {
        return "0.0".to_string();
    }
    let savings = (original as f64 - converted as f64) / original as f64 * 100.0;
    format!("{:.1}", savings)
}
