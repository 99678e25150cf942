use super::interval::{build_day_segments, subtract_intervals, Interval};
use super::models::{DaySchedule, ExceptionType, ScheduleInputs, ScheduleSegment};
use super::{WORK_DAY_END, WORK_DAY_START};
use crate::utils::time::{saturday_index, week_dates, MINUTES_PER_DAY};
use chrono::NaiveDate;

/// Build the Saturday-first weekly view for the week containing `any_date`
pub fn build_weekly_schedule(any_date: NaiveDate, inputs: &ScheduleInputs) -> Vec<DaySchedule> {
    week_dates(any_date)
        .into_iter()
        .map(|date| build_day(date, inputs))
        .collect()
}

/// Three-state segments for one calendar date
pub fn build_day(date: NaiveDate, inputs: &ScheduleInputs) -> DaySchedule {
    let day_of_week = saturday_index(date);
    let available = available_for_day(date, day_of_week, inputs);
    let busy = busy_for_day(date, inputs);

    let segments = build_day_segments(&available, &busy, WORK_DAY_START, WORK_DAY_END)
        .into_iter()
        .map(ScheduleSegment::from)
        .collect();

    DaySchedule {
        day_of_week,
        date: date.format("%Y-%m-%d").to_string(),
        segments,
    }
}

/// Recurring availability net of BLOCKED exceptions
fn available_for_day(date: NaiveDate, day_of_week: u8, inputs: &ScheduleInputs) -> Vec<Interval> {
    let mut available = inputs.recurring_for_day(day_of_week);

    for exception in inputs
        .exceptions_on(date)
        .filter(|e| e.exception_type == ExceptionType::Blocked)
    {
        if exception.is_whole_day() {
            available.clear();
            break;
        }
        if let Some(cut) = exception.interval() {
            available = subtract_intervals(&available, &[cut]);
        }
    }

    available
}

/// BUSY exceptions plus booked sessions.
///
/// A whole-day BUSY exception occupies the entire day.
fn busy_for_day(date: NaiveDate, inputs: &ScheduleInputs) -> Vec<Interval> {
    let mut busy: Vec<Interval> = inputs
        .exceptions_on(date)
        .filter(|e| e.exception_type == ExceptionType::Busy)
        .filter_map(|e| {
            if e.is_whole_day() {
                Some(Interval::new(0, MINUTES_PER_DAY))
            } else {
                e.interval()
            }
        })
        .collect();

    busy.extend(inputs.bookings_on(date));
    busy
}
