//! Storage collaborator for the scheduling core.
//!
//! The core only reads teachers, recurring rows, exceptions and class
//! sessions; the only writes are the replace-all of recurring rows and
//! single-exception create/delete.

mod memory;
mod redis_store;

pub use memory::InMemoryStore;
pub use redis_store::RedisStore;

use crate::availability::models::{AvailabilityException, RecurringAvailability, TaughtClass};
use crate::error::ScheduleResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Query shapes the scheduling core needs from persistence
#[async_trait]
pub trait AvailabilityStore: Send + Sync + 'static {
    /// Whether the teacher is known to the store
    async fn teacher_exists(&self, teacher_id: &str) -> ScheduleResult<bool>;

    /// All recurring rows of a teacher, every weekday
    async fn recurring_availability(
        &self,
        teacher_id: &str,
    ) -> ScheduleResult<Vec<RecurringAvailability>>;

    /// Exceptions dated in `[from, to)`
    async fn exceptions_between(
        &self,
        teacher_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<Vec<AvailabilityException>>;

    /// Classes of the teacher with their non-cancelled sessions in `[from, to)`
    async fn classes_with_sessions(
        &self,
        teacher_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<TaughtClass>>;

    /// Atomically swap every recurring row of a teacher for `rows`
    async fn replace_recurring_availability(
        &self,
        teacher_id: &str,
        rows: Vec<RecurringAvailability>,
    ) -> ScheduleResult<()>;

    /// Persist one exception
    async fn insert_exception(&self, exception: &AvailabilityException) -> ScheduleResult<()>;

    /// Delete an exception by id, `false` when it did not exist
    async fn delete_exception(&self, exception_id: Uuid) -> ScheduleResult<bool>;
}

/// Keep only non-cancelled sessions in `[from, to)`
pub(crate) fn filter_sessions(
    classes: impl IntoIterator<Item = TaughtClass>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<TaughtClass> {
    classes
        .into_iter()
        .map(|mut class| {
            class
                .sessions
                .retain(|s| !s.cancelled && s.date >= from && s.date < to);
            class
        })
        .collect()
}

/// Keep only exceptions dated in `[from, to)`
pub(crate) fn filter_exceptions(
    exceptions: impl IntoIterator<Item = AvailabilityException>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<AvailabilityException> {
    exceptions
        .into_iter()
        .filter(|e| e.date >= from && e.date < to)
        .collect()
}
