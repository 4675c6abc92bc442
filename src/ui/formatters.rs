use chrono::{DateTime, Local, Utc};

/// Format a sample timestamp in local time (YYYY-MM-DD HH:MM:SS)
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Format an optional timestamp, `None` rendered as `-`
pub fn format_optional_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

/// Format a metric value: integers without decimals, anything else with two
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a byte count in human-readable form (B, kB, MB, ...)
pub fn format_size(size: u64) -> String {
    humansize::format_size(size, humansize::DECIMAL)
}
