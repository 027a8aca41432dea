pub mod checkout;
pub mod common;
pub mod event_types;
pub mod events;
pub mod products;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::services::{catalog::CatalogService, checkout::CheckoutService, events::EventService};

/// Aggregate of the services used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub events: Arc<EventService>,
    pub checkout: Arc<CheckoutService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            events: Arc::new(EventService::new(db.clone())),
            checkout: Arc::new(CheckoutService::new(db)),
        }
    }
}
