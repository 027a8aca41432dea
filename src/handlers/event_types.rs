use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError,
    handlers::common::{created_message, validate_input},
    services::catalog::EventTypeRow,
    AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventTypeRequest {
    #[validate(length(min = 1, max = 255, message = "Event type name must not be empty"))]
    pub name: String,
}

/// List all event types
#[utoipa::path(
    get,
    path = "/api/eventtypes",
    responses(
        (status = 200, description = "All event types", body = [EventTypeRow]),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn list_event_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventTypeRow>>, ServiceError> {
    let event_types = state.services.catalog.list_event_types().await?;
    Ok(Json(event_types))
}

/// Create a new event type
#[utoipa::path(
    post,
    path = "/api/eventtypes",
    request_body = CreateEventTypeRequest,
    responses(
        (status = 201, description = "Event type created"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Events"
)]
pub async fn create_event_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventTypeRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    state
        .services
        .catalog
        .create_event_type(payload.name)
        .await?;

    Ok(created_message("Event type added successfully"))
}

pub fn event_types_routes() -> Router<AppState> {
    Router::new().route("/", get(list_event_types).post(create_event_type))
}
