//! Lenient number handling for supplier text fields

/// Read the leading decimal integer of `text`, the way spreadsheet exports
/// expect: `"12"` -> 12, `" 7 adet"` -> 7, `"5.0"` -> 5, `"abc"` -> 0.
///
/// Values past the `i64` range saturate.
pub fn leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Turn an integer percentage into a decimal rate string: `"18"` -> `"0.18"`.
///
/// Empty or non-numeric input yields `""`.
pub fn percent_to_rate(percent: &str) -> String {
    match percent.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let rate = value / 100.0;
            if rate == 0.0 {
                "0".to_string()
            } else {
                rate.to_string()
            }
        },
        _ => String::new(),
    }
}
