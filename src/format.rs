use chrono::{DateTime, Utc};
use rust_decimal::RoundingStrategy;

use crate::calendar::Calendar;
use crate::decimal::Money;

const CURRENCY_SYMBOL: &str = "₹";

/// format an amount as rupees with 0 to 2 fraction digits
///
/// Fixed locale: Indian rupee with en-IN digit grouping, for display only.
/// `₹1,00,000`, `₹10,666.67`, `₹12.5`
pub fn format_currency(amount: Money) -> String {
    let rounded = amount
        .as_decimal()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 6);
    if negative {
        out.push('-');
    }
    out.push_str(CURRENCY_SYMBOL);
    out.push_str(&group_indian(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// last three digits, then groups of two: 12345678 -> 1,23,45,678
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

/// `05 Jan 2024`, in the calendar's local day
pub fn format_date(date: DateTime<Utc>, calendar: &Calendar) -> String {
    date.with_timezone(&calendar.offset())
        .format("%d %b %Y")
        .to_string()
}

/// Today / Tomorrow / Yesterday / In N days / N days ago within a week,
/// otherwise the absolute date
pub fn format_date_relative(date: DateTime<Utc>, now: DateTime<Utc>, calendar: &Calendar) -> String {
    let diff = calendar.days_between(date, now);

    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        2..=7 => format!("In {} days", diff),
        -7..=-2 => format!("{} days ago", -diff),
        _ => format_date(date, calendar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(Money::from_major(0)), "₹0");
        assert_eq!(format_currency(Money::from_major(999)), "₹999");
        assert_eq!(format_currency(Money::from_major(10_500)), "₹10,500");
        assert_eq!(format_currency(Money::from_major(100_000)), "₹1,00,000");
        assert_eq!(format_currency(Money::from_major(12_345_678)), "₹1,23,45,678");
    }

    #[test]
    fn test_currency_fraction_digits() {
        assert_eq!(format_currency(Money::from_str_exact("10666.666666").unwrap()), "₹10,666.67");
        assert_eq!(format_currency(Money::from_str_exact("12.50").unwrap()), "₹12.5");
        assert_eq!(format_currency(Money::from_str_exact("7.004").unwrap()), "₹7");
        assert_eq!(format_currency(Money::from_str_exact("0.125").unwrap()), "₹0.13");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(Money::from_major(-2_500)), "-₹2,500");
        assert_eq!(format_currency(Money::from_str_exact("-0.001").unwrap()), "₹0");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(format_date(date, &Calendar::utc()), "05 Jan 2024");

        let late = Utc.with_ymd_and_hms(2024, 1, 5, 22, 0, 0).unwrap();
        let ist = Calendar::with_offset(FixedOffset::east_opt(330 * 60).unwrap());
        assert_eq!(format_date(late, &ist), "06 Jan 2024");
    }

    #[test]
    fn test_relative_dates() {
        let calendar = Calendar::utc();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(format_date_relative(now + Duration::hours(6), now, &calendar), "Today");
        assert_eq!(format_date_relative(now + Duration::days(1), now, &calendar), "Tomorrow");
        assert_eq!(format_date_relative(now - Duration::days(1), now, &calendar), "Yesterday");
        assert_eq!(format_date_relative(now + Duration::days(7), now, &calendar), "In 7 days");
        assert_eq!(format_date_relative(now - Duration::days(3), now, &calendar), "3 days ago");
        assert_eq!(format_date_relative(now + Duration::days(8), now, &calendar), "18 Mar 2024");
        assert_eq!(format_date_relative(now - Duration::days(30), now, &calendar), "09 Feb 2024");
    }
}
