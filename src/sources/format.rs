//! Display formatting for market figures

/// `$` + thousands separators + fixed decimals, e.g. `$1,234.50`.
/// Negative values render as `$-5.00`.
pub fn format_usd(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    let grouped = group_thousands(int_part);

    match frac_part {
        Some(frac) => format!("${}{}.{}", sign, grouped, frac),
        None => format!("${}{}", sign, grouped),
    }
}

/// Two decimals and a percent sign; negatives keep their minus
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Cut to at most `max` characters, never splitting a code point
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5, 2), "$1,234.50");
        assert_eq!(format_usd(0.0, 2), "$0.00");
        assert_eq!(format_usd(999.999, 2), "$1,000.00");
        assert_eq!(format_usd(0.000123, 2), "$0.00");
        assert_eq!(format_usd(1_234_567_890.4, 0), "$1,234,567,890");
        assert_eq!(format_usd(100.0, 0), "$100");
        assert_eq!(format_usd(-5.0, 2), "$-5.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(-3.1), "-3.10%");
        assert_eq!(format_percent(2.456), "2.46%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 500), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
