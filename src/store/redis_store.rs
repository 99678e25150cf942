use super::{filter_exceptions, filter_sessions, AvailabilityStore};
use crate::availability::models::{AvailabilityException, RecurringAvailability, TaughtClass};
use crate::error::{storage_error, ScheduleResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use redis::{AsyncCommands, Client as RedisClient};
use tracing::{debug, info};
use uuid::Uuid;

/// Redis keys
pub mod keys {
    /// Set of known teacher ids
    pub const TEACHERS: &str = "tutor_schedule:teachers";
    /// JSON list of recurring rows, one key per teacher
    pub const RECURRING_PREFIX: &str = "tutor_schedule:recurring:";
    /// Hash of exception id to JSON, one hash per teacher
    pub const EXCEPTIONS_PREFIX: &str = "tutor_schedule:exceptions:";
    /// Hash of exception id to owning teacher id
    pub const EXCEPTION_OWNERS: &str = "tutor_schedule:exception_owners";
    /// JSON list of classes with sessions, one key per teacher
    pub const CLASSES_PREFIX: &str = "tutor_schedule:classes:";
}

/// Redis-backed store
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    /// Create a client for the given connection string
    pub fn new(redis_url: &str) -> ScheduleResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| storage_error(&format!("Failed to create Redis client: {}", e)))?;

        Ok(Self { client })
    }

    /// Get a Redis connection from the client
    async fn get_connection(&self) -> ScheduleResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| storage_error(&format!("Failed to connect to Redis: {}", e)))
    }

    /// Round-trip a PING to verify the server is reachable
    pub async fn ping(&self) -> ScheduleResult<()> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Register a teacher id, normally done by the class management layer
    pub async fn register_teacher(&self, teacher_id: &str) -> ScheduleResult<()> {
        let mut conn = self.get_connection().await?;
        conn.sadd::<_, _, ()>(keys::TEACHERS, teacher_id).await?;
        Ok(())
    }

    /// Replace the class list of a teacher, normally done by the class management layer
    pub async fn save_classes(&self, teacher_id: &str, classes: &[TaughtClass]) -> ScheduleResult<()> {
        let mut conn = self.get_connection().await?;
        let json = serde_json::to_string(classes)?;

        redis::pipe()
            .atomic()
            .set(format!("{}{}", keys::CLASSES_PREFIX, teacher_id), json)
            .ignore()
            .sadd(keys::TEACHERS, teacher_id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AvailabilityStore for RedisStore {
    async fn teacher_exists(&self, teacher_id: &str) -> ScheduleResult<bool> {
        let mut conn = self.get_connection().await?;
        let exists: bool = conn.sismember(keys::TEACHERS, teacher_id).await?;
        Ok(exists)
    }

    async fn recurring_availability(
        &self,
        teacher_id: &str,
    ) -> ScheduleResult<Vec<RecurringAvailability>> {
        let key = format!("{}{}", keys::RECURRING_PREFIX, teacher_id);
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn.get(&key).await?;
        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn exceptions_between(
        &self,
        teacher_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ScheduleResult<Vec<AvailabilityException>> {
        let key = format!("{}{}", keys::EXCEPTIONS_PREFIX, teacher_id);
        let mut conn = self.get_connection().await?;

        let values: Vec<String> = conn.hvals(&key).await?;
        let exceptions = parse_exceptions(&values)?;

        Ok(filter_exceptions(exceptions, from, to))
    }

    async fn classes_with_sessions(
        &self,
        teacher_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<TaughtClass>> {
        let key = format!("{}{}", keys::CLASSES_PREFIX, teacher_id);
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn.get(&key).await?;
        let classes: Vec<TaughtClass> = match data {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        Ok(filter_sessions(classes, from, to))
    }

    async fn replace_recurring_availability(
        &self,
        teacher_id: &str,
        rows: Vec<RecurringAvailability>,
    ) -> ScheduleResult<()> {
        let key = format!("{}{}", keys::RECURRING_PREFIX, teacher_id);
        let json = serde_json::to_string(&rows)?;
        let mut conn = self.get_connection().await?;

        // The whole collection lives under one key and is swapped in MULTI/EXEC
        redis::pipe()
            .atomic()
            .set(&key, json)
            .ignore()
            .sadd(keys::TEACHERS, teacher_id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        debug!("Stored {} recurring rows for {}", rows.len(), teacher_id);
        Ok(())
    }

    async fn insert_exception(&self, exception: &AvailabilityException) -> ScheduleResult<()> {
        let key = format!("{}{}", keys::EXCEPTIONS_PREFIX, exception.teacher_id);
        let id = exception.id.to_string();
        let json = serde_json::to_string(exception)?;
        let mut conn = self.get_connection().await?;

        redis::pipe()
            .atomic()
            .hset(&key, &id, json)
            .ignore()
            .hset(keys::EXCEPTION_OWNERS, &id, &exception.teacher_id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn delete_exception(&self, exception_id: Uuid) -> ScheduleResult<bool> {
        let id = exception_id.to_string();
        let mut conn = self.get_connection().await?;

        let owner: Option<String> = conn.hget(keys::EXCEPTION_OWNERS, &id).await?;
        let Some(teacher_id) = owner else {
            return Ok(false);
        };

        let key = format!("{}{}", keys::EXCEPTIONS_PREFIX, teacher_id);
        redis::pipe()
            .atomic()
            .hdel(&key, &id)
            .ignore()
            .hdel(keys::EXCEPTION_OWNERS, &id)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        Ok(true)
    }
}

/// Decode stored exception JSON; one corrupt entry fails the whole read
fn parse_exceptions(values: &[String]) -> ScheduleResult<Vec<AvailabilityException>> {
    values
        .iter()
        .map(|json| serde_json::from_str(json).map_err(Into::into))
        .collect()
}
