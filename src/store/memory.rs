use super::{filter_exceptions, filter_sessions, AvailabilityStore};
use crate::availability::models::{AvailabilityException, RecurringAvailability, TaughtClass};
use crate::error::ScheduleResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    teachers: HashSet<String>,
    recurring: HashMap<String, Vec<RecurringAvailability>>,
    exceptions: HashMap<Uuid, AvailabilityException>,
    classes: Vec<TaughtClass>,
}

/// In-memory implementation of the store (for testing and as a fallback)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a teacher known to the store
    pub async fn add_teacher(&self, teacher_id: impl Into<String>) {
        self.tables.write().await.teachers.insert(teacher_id.into());
    }

    /// Add a class with its sessions, registering the teacher as well
    pub async fn add_class(&self, class: TaughtClass) {
        let mut tables = self.tables.write().await;
        tables.teachers.insert(class.teacher_id.clone());
        tables.classes.push(class);
    }
}

#[async_trait]
impl AvailabilityStore for InMemoryStore {
    async fn teacher_exists(&self, teacher_id: &str) -> ScheduleResult<bool> {
        Ok(self.tables.read().await.teachers.contains(teacher_id))
    }

    async fn recurring_availability(
        &self,
        teacher_id: &str,
    ) -> ScheduleResult<Vec<RecurringAvailability>> {
        let tables = self.tables.read().await;
        Ok(tables.recurring.get(teacher_id).cloned().unwrap_or_default())
    }

    async fn exceptions_between(
        &self,
        teacher_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<Vec<AvailabilityException>> {
        let tables = self.tables.read().await;
        let owned = tables
            .exceptions
            .values()
            .filter(|e| e.teacher_id == teacher_id)
            .cloned();
        Ok(filter_exceptions(owned, from, to))
    }

    async fn classes_with_sessions(
        &self,
        teacher_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<TaughtClass>> {
        let tables = self.tables.read().await;
        let taught = tables
            .classes
            .iter()
            .filter(|c| c.teacher_id == teacher_id)
            .cloned();
        Ok(filter_sessions(taught, from, to))
    }

    async fn replace_recurring_availability(
        &self,
        teacher_id: &str,
        rows: Vec<RecurringAvailability>,
    ) -> ScheduleResult<()> {
        // One write lock, so readers see either the old or the new set
        self.tables
            .write()
            .await
            .recurring
            .insert(teacher_id.to_string(), rows);
        Ok(())
    }

    async fn insert_exception(&self, exception: &AvailabilityException) -> ScheduleResult<()> {
        self.tables
            .write()
            .await
            .exceptions
            .insert(exception.id, exception.clone());
        Ok(())
    }

    async fn delete_exception(&self, exception_id: Uuid) -> ScheduleResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .exceptions
            .remove(&exception_id)
            .is_some())
    }
}
