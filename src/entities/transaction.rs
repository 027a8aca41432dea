use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A completed point-of-sale transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_id: i32,

    /// Employee operating the register (from the session token)
    pub employee_id: i32,

    /// Shift schedule the sale was rung up under
    pub schedule_id: i32,

    /// Grand total after discount; unclamped, may be negative
    pub total_cost: Decimal,

    pub transaction_date: Date,

    /// Amount tendered by the customer
    pub cash_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_detail::Entity")]
    OrderDetails,

    #[sea_orm(has_many = "super::payment_record::Entity")]
    PaymentRecords,
}

impl Related<super::order_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderDetails.def()
    }
}

impl Related<super::payment_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
