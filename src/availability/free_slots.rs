use super::interval::{merge_intervals, subtract_intervals, Interval};
use super::models::{ExceptionType, FreeSlot, ScheduleInputs};
use crate::utils::time::saturday_index;
use chrono::NaiveDate;

/// Open windows on `date` that fit a session of `duration_minutes`.
///
/// Results are sorted by start time.
pub fn find_free_slots(date: NaiveDate, duration_minutes: u32, inputs: &ScheduleInputs) -> Vec<FreeSlot> {
    free_intervals(date, duration_minutes, inputs)
        .into_iter()
        .map(FreeSlot::from)
        .collect()
}

/// Minute-level form of [`find_free_slots`]
pub fn free_intervals(date: NaiveDate, duration_minutes: u32, inputs: &ScheduleInputs) -> Vec<Interval> {
    let rows = inputs.recurring_for_day(saturday_index(date));
    if rows.is_empty() {
        return Vec::new();
    }

    let mut available = merge_intervals(&rows);

    for exception in inputs.exceptions_on(date) {
        // A whole-day exception of either type closes the day
        if exception.is_whole_day() {
            available.clear();
            break;
        }
        // Timed BUSY exceptions count as occupancy below
        if exception.exception_type == ExceptionType::Busy {
            continue;
        }
        if let Some(cut) = exception.interval() {
            available = subtract_intervals(&available, &[cut]);
        }
    }

    if available.is_empty() {
        return available;
    }

    let mut busy = inputs.bookings_on(date);
    busy.extend(
        inputs
            .exceptions_on(date)
            .filter(|e| e.exception_type == ExceptionType::Busy)
            .filter_map(|e| e.interval()),
    );

    let mut free = subtract_intervals(&available, &busy);
    free.retain(|interval| interval.len() >= duration_minutes);
    free.sort_unstable();
    free
}
