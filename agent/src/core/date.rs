//! Human-readable "today" line injected into agent instructions.

use chrono::{Datelike, Local, Weekday};

const MONTHS: [&str; 12] = [
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

/// `Today is monday, january 28, 2026.`
pub fn format_date<D: Datelike>(date: &D) -> String {
    let month = MONTHS[date.month0() as usize];
    format!(
        "Today is {}, {} {}, {}.",
        weekday_name(date.weekday()),
        month,
        date.day(),
        date.year()
    )
}

/// [`format_date`] for the local calendar day.
pub fn formatted_date_today() -> String {
    format_date(&Local::now().date_naive())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
