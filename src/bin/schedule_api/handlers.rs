use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::error;
use tutor_schedule::availability::models::{
    AvailabilityException, DaySchedule, FreeSlot, NewAvailabilityException,
    ReplaceAvailabilityRequest,
};
use tutor_schedule::error::Error;
use uuid::Uuid;

use crate::AppState;

/// Maps core errors onto HTTP responses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::TeacherNotFound(_) | Error::ExceptionNotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            other => {
                error!("Request failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// `?date=YYYY-MM-DD`, today when omitted
#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
}

/// `?date=YYYY-MM-DD&duration=N`
#[derive(Debug, Deserialize)]
pub struct FreeSlotQuery {
    pub date: NaiveDate,
    pub duration: u32,
}

/// Health check
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Weekly 3-state schedule
pub async fn weekly_schedule_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<DaySchedule>>, ApiError> {
    let date = query.date.unwrap_or_else(|| {
        Utc::now()
            .with_timezone(&state.service.timezone())
            .date_naive()
    });

    let week = state.service.weekly_schedule(&teacher_id, date).await?;
    Ok(Json(week))
}

/// Free slots for the reschedule workflow
pub async fn free_slots_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Query(query): Query<FreeSlotQuery>,
) -> Result<Json<Vec<FreeSlot>>, ApiError> {
    let slots = state
        .service
        .free_slots(&teacher_id, query.date, query.duration)
        .await?;
    Ok(Json(slots))
}

/// Stored recurring availability, used to load the editor
pub async fn get_availability_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
) -> Result<Json<ReplaceAvailabilityRequest>, ApiError> {
    let slots = state.service.recurring_slots(&teacher_id).await?;
    Ok(Json(ReplaceAvailabilityRequest { slots }))
}

/// Replace all recurring availability
pub async fn replace_availability_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Json(request): Json<ReplaceAvailabilityRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .replace_availability(&teacher_id, request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a date exception
pub async fn create_exception_handler(
    State(state): State<AppState>,
    Path(teacher_id): Path<String>,
    Json(request): Json<NewAvailabilityException>,
) -> Result<(StatusCode, Json<AvailabilityException>), ApiError> {
    let exception = state
        .service
        .create_exception(&teacher_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(exception)))
}

/// Delete a date exception
pub async fn delete_exception_handler(
    State(state): State<AppState>,
    Path(exception_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_exception(exception_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
