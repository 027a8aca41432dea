use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError,
    handlers::common::{created_message, validate_input},
    services::events::EventWithSchedule,
    AppState,
};

/// Body of `POST /api/events`, in the original wire shape.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[serde(rename = "EventTitle")]
    #[validate(length(min = 1, max = 255, message = "Event title must not be empty"))]
    pub event_title: String,
    #[serde(rename = "ScheduleStartDate")]
    pub schedule_start_date: NaiveDate,
    #[serde(rename = "ScheduleEndDate")]
    pub schedule_end_date: NaiveDate,
    #[serde(rename = "EventTypeID")]
    pub event_type_id: i32,
}

/// List all events with schedule and event-type details
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "All scheduled events", body = [EventWithSchedule]),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventWithSchedule>>, ServiceError> {
    let events = state.services.events.list_events().await?;
    Ok(Json(events))
}

/// Create a new event together with its schedule
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    state
        .services
        .events
        .create_event(
            payload.event_title,
            payload.event_type_id,
            payload.schedule_start_date,
            payload.schedule_end_date,
        )
        .await?;

    Ok(created_message("Event added successfully"))
}

/// Delete an event and its schedules
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = i32, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.events.delete_event(id).await?;
    Ok((StatusCode::OK, "Event deleted successfully"))
}

pub fn events_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", delete(delete_event))
}
