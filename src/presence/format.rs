//! Text helpers for presence lines

/// Discord rejects `details`/`state` longer than this many characters.
pub const MAX_LINE_CHARS: usize = 128;

/// Truncates to at most `max_chars` characters without splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

pub fn truncate_line(text: &str) -> String {
    truncate_chars(text, MAX_LINE_CHARS)
}

/// Compact soul/net-worth display: `999`, `1.0k`, `12.5k`.
pub fn format_souls(value: u64) -> String {
    if value >= 1000 {
        format!("{:.1}k", value as f64 / 1000.0)
    } else {
        value.to_string()
    }
}

/// Thousands-separated count: `12345` becomes `12,345`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn souls_abbreviate_from_one_thousand() {
        assert_eq!(format_souls(0), "0");
        assert_eq!(format_souls(999), "999");
        assert_eq!(format_souls(1000), "1.0k");
        assert_eq!(format_souls(12500), "12.5k");
        assert_eq!(format_souls(110_500), "110.5k");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(12345), "12,345");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn ascii_lines_truncate_to_exact_limit() {
        let long = "a".repeat(200);
        assert_eq!(truncate_line(&long).chars().count(), 128);
        assert_eq!(truncate_line("short"), "short");
    }

    #[test]
    fn multibyte_lines_truncate_on_char_boundaries() {
        let long = "é·魂🔥".repeat(50);
        let truncated = truncate_line(&long);
        assert!(truncated.chars().count() <= 128);
        assert!(long.starts_with(&truncated));
    }
}
