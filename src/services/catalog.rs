use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::{
    entities::{category, event_type, product},
    errors::ServiceError,
};

/// A product row joined with its category, in the wire shape the admin UI
/// has always consumed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductWithCategory {
    #[serde(rename = "ProductID")]
    pub product_id: i32,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Price")]
    pub price: Decimal,
    #[serde(rename = "CategoryName")]
    pub category_name: String,
    #[serde(rename = "CategoryID")]
    pub category_id: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventTypeRow {
    #[serde(rename = "EventTypeID")]
    pub event_type_id: i32,
    #[serde(rename = "EventTypeName")]
    pub name: String,
}

/// Service for the product and event-type catalog.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DatabaseConnection>,
}

impl CatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists every product with its category name (inner-join semantics:
    /// a product whose category row is missing is not listed).
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductWithCategory>, ServiceError> {
        let rows = product::Entity::find()
            .find_also_related(category::Entity)
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch products");
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(p, c)| {
                c.map(|c| ProductWithCategory {
                    product_id: p.id,
                    product_name: p.name,
                    price: p.price,
                    category_name: c.name,
                    category_id: c.id,
                })
            })
            .collect())
    }

    /// Inserts a new product and returns its generated id.
    #[instrument(skip(self), fields(name = %name, category_id))]
    pub async fn create_product(
        &self,
        name: String,
        category_id: i32,
        price: Decimal,
    ) -> Result<i32, ServiceError> {
        let model = product::ActiveModel {
            name: Set(name),
            category_id: Set(category_id),
            price: Set(price),
            ..Default::default()
        };

        let inserted = model.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to create product");
            ServiceError::DatabaseError(e)
        })?;

        info!(product_id = inserted.id, "Product created");
        Ok(inserted.id)
    }

    #[instrument(skip(self))]
    pub async fn list_event_types(&self) -> Result<Vec<EventTypeRow>, ServiceError> {
        let rows = event_type::Entity::find().all(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to fetch event types");
            ServiceError::DatabaseError(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|m| EventTypeRow {
                event_type_id: m.id,
                name: m.name,
            })
            .collect())
    }

    /// Inserts a new event type and returns its generated id.
    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_event_type(&self, name: String) -> Result<i32, ServiceError> {
        let model = event_type::ActiveModel {
            name: Set(name),
            ..Default::default()
        };

        let inserted = model.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to create event type");
            ServiceError::DatabaseError(e)
        })?;

        info!(event_type_id = inserted.id, "Event type created");
        Ok(inserted.id)
    }
}
