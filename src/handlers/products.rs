use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    errors::ServiceError,
    handlers::common::{created_message, validate_decimal_min_zero, validate_input},
    services::catalog::ProductWithCategory,
    AppState,
};

/// Body of `POST /api/products`, in the original wire shape.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name must not be empty"))]
    pub name: String,
    /// Category id
    pub category: i32,
    #[validate(custom = "validate_decimal_min_zero")]
    pub price: Decimal,
}

/// List all products with their category names
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = [ProductWithCategory]),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductWithCategory>>, ServiceError> {
    let products = state.services.catalog.list_products().await?;
    Ok(Json(products))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    state
        .services
        .catalog
        .create_product(payload.name, payload.category, payload.price)
        .await?;

    Ok(created_message("Product added successfully"))
}

pub fn products_routes() -> Router<AppState> {
    Router::new().route("/", get(list_products).post(create_product))
}
