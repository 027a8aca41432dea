use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, Statement};
use serde_json::Value;
use tower::ServiceExt;

use bakeshop_api::{
    auth::issue_session_token, config::AppConfig, db, handlers::AppServices, AppState,
};

const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";
const TEST_EMPLOYEE_ID: i32 = 4;
const TEST_SCHEDULE_ID: i32 = 6;

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    token: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // Minimal configuration suitable for tests. A single pooled
        // connection keeps the in-memory database alive for the whole test.
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            services,
        };

        let token = issue_session_token(
            &cfg.jwt_secret,
            TEST_EMPLOYEE_ID,
            TEST_SCHEDULE_ID,
            3600,
        )
        .expect("issue session token for tests");

        let router = Router::new()
            .route("/health", get(bakeshop_api::health_check))
            .nest("/api", bakeshop_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            token,
        }
    }

    /// Access the bearer token for the default signed-in employee.
    #[allow(dead_code)]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Convenience helper for authenticated JSON requests.
    #[allow(dead_code)]
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        let token = self.token.clone();
        self.request(method, uri, body, Some(&token)).await
    }

    /// Seed a product in the default "Cookies" category and return its id.
    #[allow(dead_code)]
    pub async fn seed_product(&self, name: &str, price: Decimal) -> i32 {
        self.state
            .services
            .catalog
            .create_product(name.to_string(), 1, price)
            .await
            .expect("seed product for tests")
    }

    /// Seed an event type and return its id.
    #[allow(dead_code)]
    pub async fn seed_event_type(&self, name: &str) -> i32 {
        self.state
            .services
            .catalog
            .create_event_type(name.to_string())
            .await
            .expect("seed event type for tests")
    }

    /// Run raw SQL against the test database (schema sabotage, direct seeds).
    #[allow(dead_code)]
    pub async fn execute_sql(&self, sql: &str) {
        self.state
            .db
            .execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .expect("execute raw sql in tests");
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Collect a response body as plain text.
#[allow(dead_code)]
pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 response body")
}
