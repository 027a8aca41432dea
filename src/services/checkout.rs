use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use crate::{
    auth::SessionContext,
    cart::{self, Cart, CheckoutTotals, PaymentMethod},
    entities::{order_detail, payment_record, product, transaction},
    errors::ServiceError,
};

/// One requested cart line. Prices are looked up server-side; the client
/// only names the product and how many.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutLineInput {
    pub product_id: i32,
    pub quantity: u32,
}

/// Everything the register submits for one checkout.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutInput {
    pub customer_id: i32,
    pub lines: Vec<CheckoutLineInput>,
    pub discount: Decimal,
    pub amount_paid: Decimal,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
}

/// What the register shows after a completed sale.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutReceipt {
    pub transaction_id: i32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub change: Decimal,
}

/// Service converting a cart into a persisted transaction with its order
/// details and optional payment record.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DatabaseConnection>,
}

impl CheckoutService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Completes a checkout. All writes (transaction, order details,
    /// payment record) happen inside one database transaction; a failure at
    /// any step leaves nothing behind.
    #[instrument(skip(self, input), fields(employee_id = session.employee_id, customer_id = input.customer_id))]
    pub async fn complete_checkout(
        &self,
        session: SessionContext,
        input: CheckoutInput,
    ) -> Result<CheckoutReceipt, ServiceError> {
        let cart = self.build_cart(&input.lines).await?;
        let totals = CheckoutTotals::compute(&cart, input.discount, input.amount_paid);

        cart::validate_checkout(
            &cart,
            &totals,
            input.payment_method,
            input.reference_number.as_deref(),
        )?;

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for checkout");
            ServiceError::DatabaseError(e)
        })?;

        let sale = transaction::ActiveModel {
            customer_id: Set(input.customer_id),
            employee_id: Set(session.employee_id),
            schedule_id: Set(session.schedule_id),
            total_cost: Set(totals.total),
            transaction_date: Set(Utc::now().date_naive()),
            cash_amount: Set(input.amount_paid),
            ..Default::default()
        };
        let sale = sale.insert(&txn).await.map_err(|e| {
            error!(error = %e, "Failed to insert transaction");
            ServiceError::DatabaseError(e)
        })?;

        for line in cart.lines() {
            let detail = order_detail::ActiveModel {
                transaction_id: Set(sale.id),
                product_id: Set(line.product_id),
                subtotal: Set(line.line_subtotal()),
                discounted_price: Set(line.unit_price),
                quantity: Set(line.quantity as i32),
                ..Default::default()
            };
            detail.insert(&txn).await.map_err(|e| {
                error!(error = %e, transaction_id = sale.id, product_id = line.product_id,
                       "Failed to insert order detail");
                ServiceError::DatabaseError(e)
            })?;
        }

        if input.payment_method.requires_reference() {
            let record = payment_record::ActiveModel {
                transaction_id: Set(sale.id),
                method: Set(input.payment_method.code()),
                reference_number: Set(input.reference_number.clone()),
                ..Default::default()
            };
            record.insert(&txn).await.map_err(|e| {
                error!(error = %e, transaction_id = sale.id, "Failed to insert payment record");
                ServiceError::DatabaseError(e)
            })?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit checkout");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            transaction_id = sale.id,
            total = %totals.total,
            lines = cart.lines().len(),
            "Checkout completed"
        );

        Ok(CheckoutReceipt {
            transaction_id: sale.id,
            subtotal: totals.subtotal,
            discount: totals.discount,
            total: totals.total,
            change: totals.change,
        })
    }

    /// Builds the cart from the requested lines, snapshotting name and unit
    /// price from the products table. An unknown product id is a not-found
    /// error before any write happens.
    async fn build_cart(&self, lines: &[CheckoutLineInput]) -> Result<Cart, ServiceError> {
        let mut cart = Cart::new();
        if lines.is_empty() {
            return Ok(cart);
        }

        let ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
        let products: HashMap<i32, product::Model> = product::Entity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch products for checkout");
                ServiceError::DatabaseError(e)
            })?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        for line in lines {
            let product = products.get(&line.product_id).ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", line.product_id))
            })?;
            cart.add_with_quantity(
                product.id,
                product.name.clone(),
                product.price,
                line.quantity,
            );
        }

        Ok(cart)
    }
}
