use super::interval::{Interval, Segment, SegmentState};
use crate::error::{validation_error, ScheduleResult};
use crate::utils::time::{
    format_minutes, local_date_and_minute, parse_minutes, DAYS_PER_WEEK, MINUTES_PER_DAY,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// A weekly-repeating window in which a teacher is generally free
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringAvailability {
    pub teacher_id: String,
    /// 0 = Saturday ... 6 = Friday
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl RecurringAvailability {
    /// Minute range of this row, `None` when a time does not parse
    pub fn interval(&self) -> Option<Interval> {
        Some(Interval::new(
            parse_minutes(&self.start_time)?,
            parse_minutes(&self.end_time)?,
        ))
    }
}

/// One `{dayOfWeek, startTime, endTime}` entry as sent by the editor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl AvailabilitySlot {
    pub fn new(day_of_week: u8, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            day_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Reject slots that could never produce availability
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.day_of_week >= DAYS_PER_WEEK {
            return Err(validation_error(&format!(
                "dayOfWeek {} is outside 0..=6",
                self.day_of_week
            )));
        }
        validate_range(&self.start_time, &self.end_time)
    }

    /// Attach the slot to a teacher
    pub fn into_row(self, teacher_id: &str) -> RecurringAvailability {
        RecurringAvailability {
            teacher_id: teacher_id.to_string(),
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

impl From<RecurringAvailability> for AvailabilitySlot {
    fn from(row: RecurringAvailability) -> Self {
        Self {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// Full-replacement payload for a teacher's recurring availability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub slots: Vec<AvailabilitySlot>,
}

/// Kind of a date-specific override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionType {
    /// Time the teacher was never available
    Blocked,
    /// Time occupied without being withdrawn from availability
    Busy,
}

/// A one-off override for a single calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityException {
    pub id: Uuid,
    pub teacher_id: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub exception_type: ExceptionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl AvailabilityException {
    /// Missing start or end means the exception covers the whole day
    pub fn is_whole_day(&self) -> bool {
        self.start_time.is_none() || self.end_time.is_none()
    }

    /// Minute range for a timed exception.
    ///
    /// Returns `None` for whole-day exceptions and for stored times that
    /// no longer parse; the latter are logged.
    pub fn interval(&self) -> Option<Interval> {
        let (start, end) = (self.start_time.as_deref()?, self.end_time.as_deref()?);
        match (parse_minutes(start), parse_minutes(end)) {
            (Some(start), Some(end)) => Some(Interval::new(start, end)),
            _ => {
                warn!(
                    "Ignoring exception {} with unparseable times {}-{}",
                    self.id, start, end
                );
                None
            }
        }
    }
}

/// Request body for creating an exception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAvailabilityException {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub exception_type: ExceptionType,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl NewAvailabilityException {
    /// Times must be given together, and then form a non-empty range
    pub fn validate(&self) -> ScheduleResult<()> {
        match (&self.start_time, &self.end_time) {
            (None, None) => Ok(()),
            (Some(start), Some(end)) => validate_range(start, end),
            _ => Err(validation_error(
                "startTime and endTime must both be set or both be omitted",
            )),
        }
    }

    /// Materialize the exception with a fresh id
    pub fn into_exception(self, teacher_id: &str) -> AvailabilityException {
        AvailabilityException {
            id: Uuid::new_v4(),
            teacher_id: teacher_id.to_string(),
            date: self.date,
            exception_type: self.exception_type,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// A scheduled meeting of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,
}

/// A class taught by a teacher together with its sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaughtClass {
    pub id: String,
    pub teacher_id: String,
    /// Length of every session in minutes
    pub session_duration: u32,
    #[serde(default)]
    pub sessions: Vec<ClassSession>,
}

/// A session projected onto the local wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub date: NaiveDate,
    /// Minutes since local midnight
    pub start: u32,
    pub duration: u32,
}

impl Booking {
    pub fn from_session(session: &ClassSession, duration: u32, tz: &Tz) -> Self {
        let (date, start) = local_date_and_minute(tz, &session.date);
        Self {
            date,
            start,
            duration,
        }
    }

    /// Occupied minutes, ending at midnight at the latest
    pub fn interval(&self) -> Interval {
        let end = self.start.saturating_add(self.duration).min(MINUTES_PER_DAY);
        Interval::new(self.start, end)
    }
}

/// Everything the builder and finder need about one teacher.
///
/// This is the join point of the three independent storage reads.
#[derive(Debug, Clone, Default)]
pub struct ScheduleInputs {
    pub recurring: Vec<RecurringAvailability>,
    pub exceptions: Vec<AvailabilityException>,
    pub bookings: Vec<Booking>,
}

impl ScheduleInputs {
    /// Project non-cancelled sessions of the given classes into bookings
    pub fn with_classes(mut self, classes: &[TaughtClass], tz: &Tz) -> Self {
        self.bookings.extend(classes.iter().flat_map(|class| {
            class
                .sessions
                .iter()
                .filter(|session| !session.cancelled)
                .map(|session| Booking::from_session(session, class.session_duration, tz))
        }));
        self
    }

    /// Recurring rows for a Saturday-based weekday as intervals
    pub fn recurring_for_day(&self, day_of_week: u8) -> Vec<Interval> {
        self.recurring
            .iter()
            .filter(|row| row.day_of_week == day_of_week)
            .filter_map(|row| {
                let interval = row.interval();
                if interval.is_none() {
                    warn!(
                        "Ignoring availability row for {} with unparseable times {}-{}",
                        row.teacher_id, row.start_time, row.end_time
                    );
                }
                interval
            })
            .collect()
    }

    /// Exceptions on an exact calendar date
    pub fn exceptions_on(&self, date: NaiveDate) -> impl Iterator<Item = &AvailabilityException> {
        self.exceptions.iter().filter(move |e| e.date == date)
    }

    /// Session occupancy on an exact calendar date
    pub fn bookings_on(&self, date: NaiveDate) -> Vec<Interval> {
        self.bookings
            .iter()
            .filter(|b| b.date == date)
            .map(Booking::interval)
            .collect()
    }
}

/// Wire form of a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSegment {
    pub start: String,
    pub end: String,
    pub state: SegmentState,
}

impl From<Segment> for ScheduleSegment {
    fn from(segment: Segment) -> Self {
        Self {
            start: format_minutes(segment.start),
            end: format_minutes(segment.end),
            state: segment.state,
        }
    }
}

/// One day of the weekly view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day_of_week: u8,
    /// ISO-8601 calendar date (YYYY-MM-DD)
    pub date: String,
    pub segments: Vec<ScheduleSegment>,
}

/// An open window long enough for a requested session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: String,
    pub end: String,
}

impl From<Interval> for FreeSlot {
    fn from(interval: Interval) -> Self {
        Self {
            start: format_minutes(interval.start),
            end: format_minutes(interval.end),
        }
    }
}

fn validate_range(start: &str, end: &str) -> ScheduleResult<()> {
    let start_minutes = parse_minutes(start)
        .ok_or_else(|| validation_error(&format!("Invalid start time: {}", start)))?;
    let end_minutes = parse_minutes(end)
        .ok_or_else(|| validation_error(&format!("Invalid end time: {}", end)))?;

    if start_minutes >= end_minutes {
        return Err(validation_error(&format!(
            "Start time {} must be before end time {}",
            start, end
        )));
    }

    Ok(())
}
