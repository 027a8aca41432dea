//! Integration tests for the point-of-sale checkout flow: validation order,
//! payment methods, receipt arithmetic, and transactional rollback.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use bakeshop_api::entities::{order_detail, payment_record, transaction};

async fn count_transactions(app: &TestApp) -> u64 {
    transaction::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count transactions")
}

fn cash_checkout_body(product_id: i32, other_product_id: i32) -> serde_json::Value {
    json!({
        "customer_id": 1,
        "lines": [
            { "product_id": product_id, "quantity": 2 },
            { "product_id": other_product_id, "quantity": 3 }
        ],
        "discount": 10,
        "amount_paid": 510,
        "payment_method": "cash"
    })
}

#[tokio::test]
async fn cash_checkout_persists_the_sale_and_returns_a_receipt() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;
    let scone = app.seed_product("Cherry Scone", dec!(70)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(cash_checkout_body(brownie, scone)),
        )
        .await;

    assert_eq!(response.status(), 201);
    let receipt = response_json(response).await;
    assert_eq!(receipt["subtotal"], "510");
    assert_eq!(receipt["discount"], "10");
    assert_eq!(receipt["total"], "500");
    assert_eq!(receipt["change"], "10");
    let transaction_id = receipt["transaction_id"].as_i64().expect("transaction id") as i32;

    let sale = transaction::Entity::find_by_id(transaction_id)
        .one(&*app.state.db)
        .await
        .expect("load transaction")
        .expect("transaction row");
    assert_eq!(sale.customer_id, 1);
    assert_eq!(sale.employee_id, 4);
    assert_eq!(sale.schedule_id, 6);
    assert_eq!(sale.total_cost, dec!(500));
    assert_eq!(sale.cash_amount, dec!(510));

    let details = order_detail::Entity::find()
        .filter(order_detail::Column::TransactionId.eq(transaction_id))
        .all(&*app.state.db)
        .await
        .expect("load order details");
    assert_eq!(details.len(), 2);
    let brownie_line = details
        .iter()
        .find(|d| d.product_id == brownie)
        .expect("brownie line");
    assert_eq!(brownie_line.quantity, 2);
    assert_eq!(brownie_line.subtotal, dec!(300));
    assert_eq!(brownie_line.discounted_price, dec!(150));

    // Cash sales carry no payment record.
    let records = payment_record::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count payment records");
    assert_eq!(records, 0);
}

#[tokio::test]
async fn wallet_checkout_writes_a_payment_record() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 1 }],
                "discount": 0,
                "amount_paid": 150,
                "payment_method": "digital_wallet",
                "reference_number": "WALLET-REF-001"
            })),
        )
        .await;

    assert_eq!(response.status(), 201);
    let receipt = response_json(response).await;
    let transaction_id = receipt["transaction_id"].as_i64().expect("transaction id") as i32;

    let record = payment_record::Entity::find()
        .filter(payment_record::Column::TransactionId.eq(transaction_id))
        .one(&*app.state.db)
        .await
        .expect("load payment record")
        .expect("payment record row");
    assert_eq!(record.method, 2);
    assert_eq!(record.reference_number.as_deref(), Some("WALLET-REF-001"));
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [],
                "discount": 0,
                "amount_paid": 100,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Invalid operation: Cart is empty");
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn underpayment_is_rejected_as_unprocessable() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 2 }],
                "discount": 0,
                "amount_paid": 100,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 422);
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn wallet_checkout_without_reference_is_rejected() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 1 }],
                "discount": 0,
                "amount_paid": 150,
                "payment_method": "digital_wallet"
            })),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn unknown_product_in_cart_is_a_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": 9999, "quantity": 1 }],
                "discount": 0,
                "amount_paid": 100,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 404);
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn checkout_without_a_session_token_is_unauthorized() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    let response = app
        .request(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 1 }],
                "discount": 0,
                "amount_paid": 150,
                "payment_method": "cash"
            })),
            None,
        )
        .await;

    assert_eq!(response.status(), 401);
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn oversized_discount_produces_a_negative_total() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;
    let scone = app.seed_product("Cherry Scone", dec!(70)).await;

    // Discounts are not clamped to the subtotal; the register trusts the
    // admin-entered discount and the change owed grows accordingly.
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [
                    { "product_id": brownie, "quantity": 2 },
                    { "product_id": scone, "quantity": 3 }
                ],
                "discount": 600,
                "amount_paid": 0,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 201);
    let receipt = response_json(response).await;
    assert_eq!(receipt["subtotal"], "510");
    assert_eq!(receipt["total"], "-90");
    assert_eq!(receipt["change"], "90");
}

#[tokio::test]
async fn failed_order_detail_insert_rolls_back_the_transaction() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;
    let scone = app.seed_product("Cherry Scone", dec!(70)).await;

    // Sabotage the second step of the checkout transaction.
    app.execute_sql("DROP TABLE order_details").await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(cash_checkout_body(brownie, scone)),
        )
        .await;

    assert_eq!(response.status(), 500);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Database error");

    // The transaction insert succeeded mid-flight but must not survive.
    assert_eq!(count_transactions(&app).await, 0);
}

#[tokio::test]
async fn oversized_quantity_is_rejected_before_any_write() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    // A quantity this large would truncate to a negative value if it ever
    // reached the integer order_details column.
    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 3_000_000_000u64 }],
                "discount": 0,
                "amount_paid": 450_000_000_000u64,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(count_transactions(&app).await, 0);
    let details = order_detail::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count order details");
    assert_eq!(details, 0);
}

#[tokio::test]
async fn negative_discount_is_rejected_by_validation() {
    let app = TestApp::new().await;
    let brownie = app.seed_product("Fudge Brownie", dec!(150)).await;

    let response = app
        .request_authenticated(
            Method::POST,
            "/api/checkout",
            Some(json!({
                "customer_id": 1,
                "lines": [{ "product_id": brownie, "quantity": 1 }],
                "discount": -5,
                "amount_paid": 150,
                "payment_method": "cash"
            })),
        )
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(count_transactions(&app).await, 0);
}
