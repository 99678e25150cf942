use super::free_slots::find_free_slots;
use super::models::{
    AvailabilityException, AvailabilitySlot, DaySchedule, FreeSlot, NewAvailabilityException,
    ReplaceAvailabilityRequest, ScheduleInputs,
};
use super::weekly::build_weekly_schedule;
use crate::error::{validation_error, Error, ScheduleResult};
use crate::store::AvailabilityStore;
use crate::utils::time::{local_day_start, week_start, DAYS_PER_WEEK};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Entry point the route layer calls into.
///
/// Reads go through the store and are computed from scratch on every call.
#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn AvailabilityStore>,
    tz: Tz,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AvailabilityStore>, tz: Tz) -> Self {
        Self { store, tz }
    }

    /// Timezone session instants are placed in
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Weekly 3-state schedule for the Saturday-first week containing `any_date`
    pub async fn weekly_schedule(
        &self,
        teacher_id: &str,
        any_date: NaiveDate,
    ) -> ScheduleResult<Vec<DaySchedule>> {
        let start = week_start(any_date);
        let end = start + Duration::days(i64::from(DAYS_PER_WEEK));

        let inputs = self.load_inputs(teacher_id, start, end).await?;
        let week = build_weekly_schedule(start, &inputs);

        debug!(
            "Built weekly schedule for {} starting {} ({} recurring rows, {} exceptions, {} bookings)",
            teacher_id,
            start,
            inputs.recurring.len(),
            inputs.exceptions.len(),
            inputs.bookings.len()
        );
        Ok(week)
    }

    /// Windows on `date` long enough for a session of `duration_minutes`
    pub async fn free_slots(
        &self,
        teacher_id: &str,
        date: NaiveDate,
        duration_minutes: u32,
    ) -> ScheduleResult<Vec<FreeSlot>> {
        if duration_minutes == 0 {
            return Err(validation_error("duration must be at least one minute"));
        }

        let inputs = self
            .load_inputs(teacher_id, date, date + Duration::days(1))
            .await?;
        let slots = find_free_slots(date, duration_minutes, &inputs);

        debug!(
            "Found {} free slots of {} minutes for {} on {}",
            slots.len(),
            duration_minutes,
            teacher_id,
            date
        );
        Ok(slots)
    }

    /// Current recurring availability in the editor's slot form
    pub async fn recurring_slots(&self, teacher_id: &str) -> ScheduleResult<Vec<AvailabilitySlot>> {
        let (exists, rows) = tokio::try_join!(
            self.store.teacher_exists(teacher_id),
            self.store.recurring_availability(teacher_id),
        )?;
        if !exists {
            return Err(Error::TeacherNotFound(teacher_id.to_string()));
        }

        Ok(rows.into_iter().map(AvailabilitySlot::from).collect())
    }

    /// Replace all recurring availability of a teacher.
    ///
    /// Last writer wins; there is no merge with the previous rows.
    pub async fn replace_availability(
        &self,
        teacher_id: &str,
        request: ReplaceAvailabilityRequest,
    ) -> ScheduleResult<()> {
        self.ensure_teacher(teacher_id).await?;

        for slot in &request.slots {
            slot.validate()?;
        }

        let rows: Vec<_> = request
            .slots
            .into_iter()
            .map(|slot| slot.into_row(teacher_id))
            .collect();
        let count = rows.len();

        self.store
            .replace_recurring_availability(teacher_id, rows)
            .await?;

        info!("Replaced recurring availability for {} with {} slots", teacher_id, count);
        Ok(())
    }

    /// Create one date-specific exception
    pub async fn create_exception(
        &self,
        teacher_id: &str,
        request: NewAvailabilityException,
    ) -> ScheduleResult<AvailabilityException> {
        self.ensure_teacher(teacher_id).await?;
        request.validate()?;

        let exception = request.into_exception(teacher_id);
        self.store.insert_exception(&exception).await?;

        info!(
            "Created {:?} exception {} for {} on {}",
            exception.exception_type, exception.id, teacher_id, exception.date
        );
        Ok(exception)
    }

    /// Delete an exception by id
    pub async fn delete_exception(&self, exception_id: Uuid) -> ScheduleResult<()> {
        if !self.store.delete_exception(exception_id).await? {
            return Err(Error::ExceptionNotFound(exception_id.to_string()));
        }

        info!("Deleted exception {}", exception_id);
        Ok(())
    }

    async fn ensure_teacher(&self, teacher_id: &str) -> ScheduleResult<()> {
        if self.store.teacher_exists(teacher_id).await? {
            Ok(())
        } else {
            Err(Error::TeacherNotFound(teacher_id.to_string()))
        }
    }

    /// Fetch everything for `[from, to)` in one join
    async fn load_inputs(
        &self,
        teacher_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<ScheduleInputs> {
        let range_start = local_day_start(&self.tz, from)?;
        let range_end = local_day_start(&self.tz, to)?;

        let (exists, recurring, exceptions, classes) = tokio::try_join!(
            self.store.teacher_exists(teacher_id),
            self.store.recurring_availability(teacher_id),
            self.store.exceptions_between(teacher_id, from, to),
            self.store.classes_with_sessions(teacher_id, range_start, range_end),
        )?;

        if !exists {
            return Err(Error::TeacherNotFound(teacher_id.to_string()));
        }

        let inputs = ScheduleInputs {
            recurring,
            exceptions,
            bookings: Vec::new(),
        };
        Ok(inputs.with_classes(&classes, &self.tz))
    }
}
