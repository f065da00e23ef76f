//! Display formatting for fund figures

use chrono::DateTime;

/// NAV per share, two decimals
pub fn format_nav(nav: f64) -> String {
    format!("{:.2}", nav)
}

/// Two decimals with thousands separators, e.g. `1,234,567.89`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // "-0.00" reads as noise
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

/// Signed percentage, e.g. `+4.00%` or `-1.25%`
pub fn format_percent(percent: f64) -> String {
    let rounded = format!("{:.2}", percent.abs());
    if rounded == "0.00" {
        return "0.00%".to_string();
    }
    let sign = if percent < 0.0 { '-' } else { '+' };
    format!("{}{}%", sign, rounded)
}

/// Calendar date of a Unix timestamp, in UTC
pub fn format_date(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Short date for chart axis labels
pub fn format_short_date(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nav() {
        assert_eq!(format_nav(1.04), "1.04");
        assert_eq!(format_nav(1.0), "1.00");
        assert_eq!(format_nav(0.98765), "0.99");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1_000.0), "1,000.00");
        assert_eq!(format_amount(260_000.0), "260,000.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-12_500.25), "-12,500.25");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(4.0), "+4.00%");
        assert_eq!(format_percent(-1.25), "-1.25%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(-0.001), "0.00%");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(1_672_531_200), "Jan 01, 2023");
        assert_eq!(format_date(0), "Jan 01, 1970");
        assert_eq!(format_date(u64::MAX), "unknown date");
        assert_eq!(format_short_date(1_677_628_800), "Mar 01");
    }
}
