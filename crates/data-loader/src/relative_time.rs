//! Resolving Google Maps relative review times into dates.
//!
//! Scraped reviews only say "3 months ago" or "a year ago". Those strings are
//! anchored to a fixed reference date (the day the snapshot was scraped) so
//! the same snapshot always yields the same timestamps.
//!
//! Recognised units are years, months, weeks and days. Month and year
//! arithmetic is calendar based and clamps to the end of the month
//! (2025-03-31 minus one month is 2025-02-28). Anything finer than a day,
//! or text that cannot be read, resolves to the reference date itself.

use chrono::{Days, Months, NaiveDate};

/// Day the hawker review snapshot was scraped
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 27).unwrap_or_default()
}

/// Resolve a relative time string against `reference`.
///
/// ```ignore
/// let reference = NaiveDate::from_ymd_opt(2025, 4, 27).unwrap();
/// assert_eq!(parse_relative_time(Some("2 days ago"), reference),
///            NaiveDate::from_ymd_opt(2025, 4, 25).unwrap());
/// ```
pub fn parse_relative_time(text: Option<&str>, reference: NaiveDate) -> NaiveDate {
    let Some(text) = text else {
        return reference;
    };

    let lowered = text.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace().peekable();

    // "Edited 3 months ago" carries the edit time, which is what we have
    if tokens.peek() == Some(&"edited") {
        tokens.next();
    }

    let (Some(amount), Some(unit)) = (tokens.next(), tokens.next()) else {
        return reference;
    };

    let amount: u32 = match amount {
        "a" | "an" | "one" => 1,
        other => match other.parse() {
            Ok(n) => n,
            Err(_) => return reference,
        },
    };

    let resolved = if unit.starts_with("year") {
        reference.checked_sub_months(Months::new(amount.saturating_mul(12)))
    } else if unit.starts_with("month") {
        reference.checked_sub_months(Months::new(amount))
    } else if unit.starts_with("week") {
        reference.checked_sub_days(Days::new(u64::from(amount) * 7))
    } else if unit.starts_with("day") {
        reference.checked_sub_days(Days::new(u64::from(amount)))
    } else {
        None
    };

    resolved.unwrap_or(reference)
}

/// Midnight UTC of `date` as unix seconds
pub fn to_unix_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|datetime| datetime.and_utc().timestamp())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_units() {
        let reference = default_reference_date();
        assert_eq!(parse_relative_time(Some("a year ago"), reference), date(2024, 4, 27));
        assert_eq!(parse_relative_time(Some("3 years ago"), reference), date(2022, 4, 27));
        assert_eq!(parse_relative_time(Some("2 months ago"), reference), date(2025, 2, 27));
        assert_eq!(parse_relative_time(Some("a week ago"), reference), date(2025, 4, 20));
        assert_eq!(parse_relative_time(Some("5 days ago"), reference), date(2025, 4, 22));
    }

    #[test]
    fn test_month_end_clamps() {
        let reference = date(2025, 3, 31);
        assert_eq!(parse_relative_time(Some("a month ago"), reference), date(2025, 2, 28));
    }

    #[test]
    fn test_edited_prefix() {
        let reference = default_reference_date();
        assert_eq!(
            parse_relative_time(Some("Edited 4 months ago"), reference),
            date(2024, 12, 27)
        );
    }

    #[test]
    fn test_unreadable_falls_back_to_reference() {
        let reference = default_reference_date();
        assert_eq!(parse_relative_time(None, reference), reference);
        assert_eq!(parse_relative_time(Some(""), reference), reference);
        assert_eq!(parse_relative_time(Some("3 hours ago"), reference), reference);
        assert_eq!(parse_relative_time(Some("recently"), reference), reference);
        assert_eq!(parse_relative_time(Some("many months ago"), reference), reference);
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(to_unix_seconds(date(1970, 1, 2)), 86_400);
    }
}
