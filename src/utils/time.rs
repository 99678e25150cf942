use crate::error::{other_error, ScheduleResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Minutes in a full day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Days in a Saturday-first week
pub const DAYS_PER_WEEK: u8 = 7;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse a HH:MM string into minutes since midnight
pub fn parse_minutes(time_str: &str) -> Option<u32> {
    parse_time(time_str).map(|(hour, minute)| hour * 60 + minute)
}

/// Format minutes since midnight as zero-padded HH:MM.
///
/// Values past the end of the day are capped at `24:00`.
pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes.min(MINUTES_PER_DAY);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Saturday-based day-of-week index (0 = Saturday ... 6 = Friday)
pub fn saturday_index(date: NaiveDate) -> u8 {
    // chrono counts from Sunday = 0
    ((date.weekday().num_days_from_sunday() + 1) % 7) as u8
}

/// Saturday that starts the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(saturday_index(date)))
}

/// The seven calendar dates of the week containing `date`, Saturday first
pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..i64::from(DAYS_PER_WEEK))
        .map(|offset| start + Duration::days(offset))
        .collect()
}

/// First instant of a local calendar day.
///
/// When midnight falls into a DST gap the day starts at the first valid
/// local time after it.
pub fn local_day_start(tz: &Tz, date: NaiveDate) -> ScheduleResult<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| other_error(&format!("Invalid date {}", date)))?;

    (0..=2)
        .find_map(|hours| {
            tz.from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| other_error(&format!("No local midnight for {} in {}", date, tz)))
}

/// Local calendar date and minute-of-day of an instant
pub fn local_date_and_minute(tz: &Tz, instant: &DateTime<Utc>) -> (NaiveDate, u32) {
    let local = instant.with_timezone(tz);
    (local.date_naive(), local.hour() * 60 + local.minute())
}
