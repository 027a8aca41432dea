use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    auth::SessionContext,
    cart::PaymentMethod,
    errors::ServiceError,
    handlers::common::{created_response, validate_decimal_min_zero, validate_input},
    services::checkout::{CheckoutInput, CheckoutLineInput},
    AppState,
};

/// Body of `POST /api/checkout`. Employee and schedule references come from
/// the session token, never from the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    pub customer_id: i32,
    pub lines: Vec<CheckoutRequestLine>,
    /// Non-negative currency amount subtracted from the subtotal
    #[serde(default)]
    #[validate(custom = "validate_decimal_min_zero")]
    pub discount: Decimal,
    /// Amount tendered by the customer
    #[validate(custom = "validate_decimal_min_zero")]
    pub amount_paid: Decimal,
    pub payment_method: PaymentMethod,
    /// Required for digital wallet payments
    pub reference_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckoutRequestLine {
    pub product_id: i32,
    /// Bounded by `cart::MAX_LINE_QUANTITY`
    #[validate(range(min = 1, max = 1_000_000, message = "Quantity is out of range"))]
    pub quantity: u32,
}

/// Complete a checkout: persist the transaction, its order details, and an
/// optional payment record, all inside one database transaction
#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Sale completed", body = crate::services::checkout::CheckoutReceipt),
        (status = 400, description = "Empty cart or missing reference number", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing or invalid session token", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product in cart", body = crate::errors::ErrorResponse),
        (status = 422, description = "Amount paid is less than the total", body = crate::errors::ErrorResponse),
        (status = 500, description = "Database failure", body = crate::errors::ErrorResponse)
    ),
    security(("Bearer" = [])),
    tag = "Checkout"
)]
pub async fn complete_checkout(
    session: SessionContext,
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    for line in &payload.lines {
        validate_input(line)?;
    }

    let input = CheckoutInput {
        customer_id: payload.customer_id,
        lines: payload
            .lines
            .into_iter()
            .map(|l| CheckoutLineInput {
                product_id: l.product_id,
                quantity: l.quantity,
            })
            .collect(),
        discount: payload.discount,
        amount_paid: payload.amount_paid,
        payment_method: payload.payment_method,
        reference_number: payload.reference_number,
    };

    let receipt = state
        .services
        .checkout
        .complete_checkout(session, input)
        .await?;

    Ok(created_response(receipt))
}

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", post(complete_checkout))
}
