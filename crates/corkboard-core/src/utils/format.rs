use chrono::{DateTime, Local, NaiveDateTime};

/// Layouts the board service uses for timestamps without an offset
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Format a timestamp as `YYYY-MM-DD HH:MM` in local time.
/// Timestamps without an offset are shown as-is; unparseable input is
/// returned unchanged.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date, layout) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    date.to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Collapse a multi-line body into a single-line preview
pub fn preview(content: &str, max_len: usize) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&single_line, max_len)
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    value.unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_naive() {
        assert_eq!(format_date("2024-05-01T09:03:27"), "2024-05-01 09:03");
        assert_eq!(format_date("2024-05-01T09:03:27.123456"), "2024-05-01 09:03");
        assert_eq!(format_date("2024-12-31 23:59:59"), "2024-12-31 23:59");
    }

    #[test]
    fn test_format_date_with_offset_uses_local_time() {
        let expected = DateTime::parse_from_rfc3339("2024-05-01T09:03:27Z")
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(format_date("2024-05-01T09:03:27Z"), expected);
    }

    #[test]
    fn test_format_date_unparseable() {
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("안녕하세요 여러분", 5), "안녕...");
    }

    #[test]
    fn test_preview_flattens_lines() {
        assert_eq!(preview("first line\n\nsecond   line", 40), "first line second line");
        assert_eq!(preview("a b c d e f g h", 7), "a b ...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some("x"), "-"), "x");
        assert_eq!(format_optional(None, "-"), "-");
    }
}
