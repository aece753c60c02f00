//! Date phrases as rendered on the profile page.
//!
//! The page prints relative phrases ("Today", "Yesterday") and long-form
//! dates ("January 2, 2006") for anything older. Relative phrases are
//! resolved against the timezone the upstream service renders for, not the
//! machine running the watcher.

use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Singapore;

use crate::error::ParseError;

/// Wall-clock date in the timezone the upstream pages are rendered for.
pub fn today_in_reference_tz() -> NaiveDate {
    Utc::now().with_timezone(&Singapore).date_naive()
}

/// Normalize a profile-page date phrase to a calendar date. `today`
/// anchors the relative phrases; production callers pass
/// [`today_in_reference_tz`], tests pin a fixed date.
pub fn parse_activity_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    match input.to_lowercase().as_str() {
        "today" => Ok(today),
        "yesterday" => Ok(today.pred_opt().unwrap_or(today)),
        _ => NaiveDate::parse_from_str(input, "%B %d, %Y")
            .map_err(|_| ParseError::DateFormat(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    #[test]
    fn today_resolves_to_reference_date() {
        let date = parse_activity_date("Today", pinned_today()).unwrap();
        assert_eq!(date, pinned_today());
    }

    #[test]
    fn relative_phrases_ignore_case() {
        assert_eq!(
            parse_activity_date("TODAY", pinned_today()).unwrap(),
            parse_activity_date("today", pinned_today()).unwrap()
        );
    }

    #[test]
    fn yesterday_is_one_day_earlier() {
        let date = parse_activity_date("Yesterday", pinned_today()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    }

    #[test]
    fn yesterday_crosses_month_boundaries() {
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let date = parse_activity_date("Yesterday", first).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn long_form_dates_parse() {
        let date = parse_activity_date("January 2, 2006", pinned_today()).unwrap();
        assert_eq!(date.to_string(), "2006-01-02");
    }

    #[test]
    fn unrecognized_phrase_is_a_date_format_error() {
        let err = parse_activity_date("not a date", pinned_today()).unwrap_err();
        assert!(matches!(err, ParseError::DateFormat(_)));
        assert!(err.to_string().contains("not a date"));
    }
}
