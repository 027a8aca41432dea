use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Non-cash payment details attached to a transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub transaction_id: i32,

    /// Payment method code (1 = cash, 2 = digital wallet)
    pub method: i32,

    /// Externally issued identifier, required for non-cash payments
    pub reference_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transaction::Entity",
        from = "Column::TransactionId",
        to = "super::transaction::Column::Id"
    )]
    Transaction,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
