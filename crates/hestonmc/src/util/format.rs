/// Insert a comma every three digits of an unsigned digit string
fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format an integer count with thousands separators (e.g. 64,000,000)
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Format a dollar amount with thousands separators and `decimals` places
pub fn format_dollars(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, frac) = match formatted.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (formatted.as_str(), None),
    };

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac {
        Some(f) => format!("{sign}${}.{f}", group_digits(whole)),
        None => format!("{sign}${}", group_digits(whole)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(400), "400");
        assert_eq!(format_count(160_000), "160,000");
        assert_eq!(format_count(64_000_000), "64,000,000");
    }

    #[test]
    fn test_format_dollars() {
        assert_eq!(format_dollars(2.06512, 4), "$2.0651");
        assert_eq!(format_dollars(239_123.6, 0), "$239,124");
        assert_eq!(format_dollars(1234.5, 2), "$1,234.50");
        assert_eq!(format_dollars(-0.25, 2), "-$0.25");
        assert_eq!(format_dollars(-0.00001, 2), "$0.00");
    }
}
