use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::errors::AppError;

/// Half-open UTC interval covering one calendar month: `[start, end)`.
///
/// All month filtering goes through this type. Matching against a formatted
/// date string (e.g. a `-03-` substring) also matches day-of-month and year
/// digits, so the interval form is the only supported strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse an English month name (case-insensitive) into its 1-based number.
fn month_number(name: &str) -> Option<u32> {
    let lower = name.trim().to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

impl MonthRange {
    /// Resolve a month name against the given year.
    ///
    /// `start` is the first instant of the month, `end` the first instant of
    /// the following month; December rolls `end` into January of `year + 1`.
    /// An unrecognised name is a caller error, never a silent no-match.
    pub fn resolve(name: &str, year: i32) -> Result<Self, AppError> {
        let month = month_number(name).ok_or_else(|| {
            AppError::ValidationError(format!("'{name}' is not a valid month name"))
        })?;

        let (end_year, end_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        // The first day of a month at midnight always exists in UTC.
        let start = Utc
            .with_ymd_and_hms(year, month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                AppError::InternalError(format!("invalid month start: {year}-{month:02}"))
            })?;
        let end = Utc
            .with_ymd_and_hms(end_year, end_month, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| {
                AppError::InternalError(format!("invalid month end: {end_year}-{end_month:02}"))
            })?;

        Ok(MonthRange { start, end })
    }

    /// Resolve a month name against the current calendar year, so "March"
    /// always means March of `now().year`.
    pub fn current_year(name: &str) -> Result<Self, AppError> {
        Self::resolve(name, Utc::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_march_interval() {
        let range = MonthRange::resolve("March", 2024).expect("Should resolve March");
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let lower = MonthRange::resolve("march", 2024).expect("Should resolve");
        let upper = MonthRange::resolve("MARCH", 2024).expect("Should resolve");
        let mixed = MonthRange::resolve("mArCh", 2024).expect("Should resolve");
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_resolve_invalid_name_is_validation_error() {
        let err = MonthRange::resolve("Marchtober", 2024).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = MonthRange::resolve("", 2024).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn test_intervals_are_contiguous_across_the_year() {
        for window in MONTH_NAMES.windows(2) {
            let current = MonthRange::resolve(window[0], 2024).expect("Should resolve");
            let next = MonthRange::resolve(window[1], 2024).expect("Should resolve");
            assert_eq!(
                current.end, next.start,
                "{} should end where {} starts",
                window[0], window[1]
            );
        }
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let december = MonthRange::resolve("December", 2024).expect("Should resolve");
        assert_eq!(
            december.end,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            "December should end at January 1 of the following year"
        );
    }

    #[test]
    fn test_leap_february_covers_the_29th() {
        let february = MonthRange::resolve("February", 2024).expect("Should resolve");
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert!(february.start <= leap_day && leap_day < february.end);
    }
}
