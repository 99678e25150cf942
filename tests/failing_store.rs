use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tutor_schedule::availability::models::{
    AvailabilityException, RecurringAvailability, TaughtClass,
};
use tutor_schedule::availability::AvailabilityService;
use tutor_schedule::error::{storage_error, Error, ScheduleResult};
use tutor_schedule::store::AvailabilityStore;
use uuid::Uuid;

/// Store whose teacher lookup works but every other read fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl AvailabilityStore for FailingStore {
    async fn teacher_exists(&self, _teacher_id: &str) -> ScheduleResult<bool> {
        Ok(true)
    }

    async fn recurring_availability(
        &self,
        _teacher_id: &str,
    ) -> ScheduleResult<Vec<RecurringAvailability>> {
        Ok(Vec::new())
    }

    async fn exceptions_between(
        &self,
        _teacher_id: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> ScheduleResult<Vec<AvailabilityException>> {
        Err(storage_error("exceptions table unavailable"))
    }

    async fn classes_with_sessions(
        &self,
        _teacher_id: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<TaughtClass>> {
        Ok(Vec::new())
    }

    async fn replace_recurring_availability(
        &self,
        _teacher_id: &str,
        _rows: Vec<RecurringAvailability>,
    ) -> ScheduleResult<()> {
        Err(storage_error("read-only replica"))
    }

    async fn insert_exception(&self, _exception: &AvailabilityException) -> ScheduleResult<()> {
        Err(storage_error("read-only replica"))
    }

    async fn delete_exception(&self, _exception_id: Uuid) -> ScheduleResult<bool> {
        Err(storage_error("read-only replica"))
    }
}

#[tokio::test]
async fn test_read_failure_fails_the_whole_request() {
    let service = AvailabilityService::new(Arc::new(FailingStore), chrono_tz::UTC);
    let date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();

    let err = service.weekly_schedule("t1", date).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));

    let err = service.free_slots("t1", date, 60).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

#[tokio::test]
async fn test_write_failure_is_reported() {
    let service = AvailabilityService::new(Arc::new(FailingStore), chrono_tz::UTC);

    let err = service
        .delete_exception(Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}
