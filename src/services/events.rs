use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::{
    entities::{event, schedule},
    errors::ServiceError,
};

/// An event joined with its schedule, in the wire shape the admin UI has
/// always consumed. The join is inner: an event with no schedule row is
/// invisible here.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct EventWithSchedule {
    #[serde(rename = "EventID")]
    pub event_id: i32,
    #[serde(rename = "EventTitle")]
    pub event_title: String,
    #[serde(rename = "ScheduleID")]
    pub schedule_id: i32,
    #[serde(rename = "ScheduleStartDate")]
    pub schedule_start_date: NaiveDate,
    #[serde(rename = "ScheduleEndDate")]
    pub schedule_end_date: NaiveDate,
    #[serde(rename = "EventTypeID")]
    pub event_type_id: i32,
}

/// Service for events and their schedules.
#[derive(Clone)]
pub struct EventService {
    db: Arc<DatabaseConnection>,
}

impl EventService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists events inner-joined with their schedule and event type.
    #[instrument(skip(self))]
    pub async fn list_events(&self) -> Result<Vec<EventWithSchedule>, ServiceError> {
        let rows = event::Entity::find()
            .select_only()
            .column_as(event::Column::Id, "event_id")
            .column_as(event::Column::Title, "event_title")
            .column_as(schedule::Column::Id, "schedule_id")
            .column_as(schedule::Column::StartDate, "schedule_start_date")
            .column_as(schedule::Column::EndDate, "schedule_end_date")
            .column_as(event::Column::EventTypeId, "event_type_id")
            .join(JoinType::InnerJoin, event::Relation::Schedules.def())
            .join(JoinType::InnerJoin, event::Relation::EventType.def())
            .into_model::<EventWithSchedule>()
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch events");
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows)
    }

    /// Creates an event and its schedule in one database transaction; a
    /// failure on either insert leaves no rows behind.
    #[instrument(skip(self), fields(title = %title))]
    pub async fn create_event(
        &self,
        title: String,
        event_type_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<i32, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for event creation");
            ServiceError::DatabaseError(e)
        })?;

        let event_model = event::ActiveModel {
            title: Set(title),
            event_type_id: Set(event_type_id),
            ..Default::default()
        };
        let event_model = event_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to insert event");
            ServiceError::DatabaseError(e)
        })?;

        let schedule_model = schedule::ActiveModel {
            event_id: Set(event_model.id),
            start_date: Set(start_date),
            end_date: Set(end_date),
            ..Default::default()
        };
        schedule_model.insert(&txn).await.map_err(|e| {
            error!(error = %e, event_id = event_model.id, "Failed to insert schedule");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit event creation");
            ServiceError::DatabaseError(e)
        })?;

        info!(event_id = event_model.id, "Event created");
        Ok(event_model.id)
    }

    /// Deletes an event's schedules and then the event itself in one
    /// database transaction. Deleting an id with no matching rows is not an
    /// error.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, event_id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for event deletion");
            ServiceError::DatabaseError(e)
        })?;

        schedule::Entity::delete_many()
            .filter(schedule::Column::EventId.eq(event_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, event_id, "Failed to delete schedules");
                ServiceError::DatabaseError(e)
            })?;

        let deleted = event::Entity::delete_many()
            .filter(event::Column::Id.eq(event_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, event_id, "Failed to delete event");
                ServiceError::DatabaseError(e)
            })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, event_id, "Failed to commit event deletion");
            ServiceError::DatabaseError(e)
        })?;

        info!(event_id, rows = deleted.rows_affected, "Event deleted");
        Ok(())
    }
}
