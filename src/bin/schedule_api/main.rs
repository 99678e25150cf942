mod handlers;

use axum::{
    routing::{delete, get},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tutor_schedule::availability::AvailabilityService;
use tutor_schedule::error::Error;
use tutor_schedule::{shutdown, startup};

use crate::handlers::{
    create_exception_handler, delete_exception_handler, free_slots_handler,
    get_availability_handler, health_handler, replace_availability_handler,
    weekly_schedule_handler,
};

#[derive(Clone)]
pub struct AppState {
    /// Scheduling core
    pub service: AvailabilityService,
}

/// Build the router
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/teachers/{teacher_id}/schedule", get(weekly_schedule_handler))
        .route("/teachers/{teacher_id}/free-slots", get(free_slots_handler))
        .route(
            "/teachers/{teacher_id}/availability",
            get(get_availability_handler).put(replace_availability_handler),
        )
        .route(
            "/teachers/{teacher_id}/exceptions",
            axum::routing::post(create_exception_handler),
        )
        .route("/exceptions/{exception_id}", delete(delete_exception_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting schedule API");

    // Load configuration
    let config = startup::load_config()?;
    let service = startup::build_service(&config).await?;

    let app = build_router(AppState { service });

    // Bind to address and run server
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Schedule API shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use tutor_schedule::store::InMemoryStore;

    async fn test_app() -> Router {
        let store = InMemoryStore::new();
        store.add_teacher("t1").await;
        let service = AvailabilityService::new(Arc::new(store), chrono_tz::UTC);
        build_router(AppState { service })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_availability_and_free_slots() {
        let app = test_app().await;

        // Sunday 08:00-20:00
        let (status, _) = send(
            &app,
            "PUT",
            "/teachers/t1/availability",
            Some(r#"{"slots":[{"dayOfWeek":1,"startTime":"08:00","endTime":"20:00"}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            "POST",
            "/teachers/t1/exceptions",
            Some(r#"{"date":"2024-01-07","type":"BUSY","startTime":"10:00","endTime":"11:00"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "GET", "/teachers/t1/free-slots?date=2024-01-07&duration=60", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([
                { "start": "08:00", "end": "10:00" },
                { "start": "11:00", "end": "20:00" }
            ])
        );

        let (status, body) = send(&app, "GET", "/teachers/t1/schedule?date=2024-01-07", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(7));
        assert_eq!(body[1]["date"], "2024-01-07");
        assert_eq!(body[1]["segments"][2]["state"], "busy");
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let app = test_app().await;

        let (status, _) = send(&app, "GET", "/teachers/nobody/schedule?date=2024-01-07", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "PUT",
            "/teachers/t1/availability",
            Some(r#"{"slots":[{"dayOfWeek":8,"startTime":"08:00","endTime":"20:00"}]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("dayOfWeek"));

        let uri = format!("/exceptions/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
