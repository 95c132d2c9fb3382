use chrono::{DateTime, Utc};

/// Format a byte count for display using 1024-based units, trimming
/// trailing zeros ("1 KB", "2.5 MB").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);

    let mut formatted = format!("{:.2}", value);
    if formatted.contains('.') {
        formatted = formatted.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", formatted, UNITS[exponent])
}

/// Format an ISO timestamp to a readable date
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // Fall back to the YYYY-MM-DD prefix
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format a share expiry as a relative label: "Expired", "Today",
/// "Tomorrow", "N days" or "Never" when no deadline is set.
pub fn format_expiry(expires_at: Option<&str>) -> String {
    let Some(raw) = expires_at else {
        return "Never".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => expiry_label(dt.with_timezone(&Utc), Utc::now()),
        Err(_) => raw.to_string(),
    }
}

fn expiry_label(expiry: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if expiry < now {
        return "Expired".to_string();
    }
    let remaining = expiry - now;
    let days = (remaining.num_seconds() as f64 / 86_400.0).ceil() as i64;
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n => format!("{} days", n),
    }
}

/// Case-insensitive substring check for list filtering
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2_621_440), "2.5 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-03-15T10:30:00.000Z"), "Mar 15, 2026");
        assert_eq!(format_date("2026-03-15"), "2026-03-15");
        assert_eq!(format_date("bogus"), "bogus");
    }

    #[test]
    fn test_expiry_label() {
        let now = Utc::now();
        assert_eq!(expiry_label(now - Duration::hours(1), now), "Expired");
        assert_eq!(expiry_label(now + Duration::hours(6), now), "Tomorrow");
        assert_eq!(expiry_label(now + Duration::days(5), now), "5 days");
        assert_eq!(format_expiry(None), "Never");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
