use crate::error::{config_error, AppResult};
use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;

/// Parse an IANA timezone name into a chrono-tz timezone
pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| config_error(&format!("Invalid timezone: {}", name)))
}

/// Monday of the week the given date falls in
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Where a day group falls relative to today's week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekLabel {
    ThisWeek,
    NextWeek,
    Other,
}

/// Label a date relative to the Monday-based week containing `today`
pub fn week_label(date: NaiveDate, today: NaiveDate) -> WeekLabel {
    let this_monday = week_start(today);
    let next_monday = this_monday + Duration::days(7);
    let following_monday = next_monday + Duration::days(7);

    if date >= this_monday && date < next_monday {
        WeekLabel::ThisWeek
    } else if date >= next_monday && date < following_monday {
        WeekLabel::NextWeek
    } else {
        WeekLabel::Other
    }
}
