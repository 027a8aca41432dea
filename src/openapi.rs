use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bakeshop API",
        version = "1.0.0",
        description = r#"
# Bakeshop Admin & Point-of-Sale API

Backend for a bakery storefront: product catalog and event administration
plus the register's checkout workflow.

## Authentication

Checkout requires a session token identifying the signed-in employee and the
shift schedule they are working. Include it in the Authorization header:

```
Authorization: Bearer <session-token>
```

Catalog administration endpoints are open on the trusted admin network.

## Error Handling

Errors use a consistent response shape with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Cart is empty",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Events", description = "Event and event type endpoints"),
        (name = "Checkout", description = "Point-of-sale checkout endpoints")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,

        // Events
        crate::handlers::events::list_events,
        crate::handlers::events::create_event,
        crate::handlers::events::delete_event,
        crate::handlers::event_types::list_event_types,
        crate::handlers::event_types::create_event_type,

        // Checkout
        crate::handlers::checkout::complete_checkout,
    ),
    components(
        schemas(
            // Catalog types
            crate::services::catalog::ProductWithCategory,
            crate::services::catalog::EventTypeRow,
            crate::handlers::products::CreateProductRequest,
            crate::handlers::event_types::CreateEventTypeRequest,

            // Event types
            crate::services::events::EventWithSchedule,
            crate::handlers::events::CreateEventRequest,

            // Checkout types
            crate::handlers::checkout::CheckoutRequest,
            crate::handlers::checkout::CheckoutRequestLine,
            crate::services::checkout::CheckoutReceipt,
            crate::cart::PaymentMethod,

            // Error types
            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "Bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
