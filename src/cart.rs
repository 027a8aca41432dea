//! Cart value object and checkout arithmetic.
//!
//! The cart is an explicit, serializable value passed through the checkout
//! request; nothing here touches the database. Totals are intentionally
//! unclamped: a discount larger than the subtotal produces a negative total,
//! and a negative total never blocks checkout (any non-negative amount paid
//! covers it). Whether that should be rejected is an open product question;
//! see DESIGN.md.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Payment method codes as persisted in `payment_records`.
pub const METHOD_CODE_CASH: i32 = 1;
pub const METHOD_CODE_DIGITAL_WALLET: i32 = 2;

/// Upper bound for a single line's quantity. Keeps persisted quantities
/// inside `i32` and keeps merge arithmetic overflow-free.
pub const MAX_LINE_QUANTITY: u32 = 1_000_000;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn code(self) -> i32 {
        match self {
            PaymentMethod::Cash => METHOD_CODE_CASH,
            PaymentMethod::DigitalWallet => METHOD_CODE_DIGITAL_WALLET,
        }
    }

    /// Cash needs no reference number; everything else does.
    pub fn requires_reference(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// One product plus a user-editable quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: i32,
    /// Name snapshot at the time the line was added
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Sets the quantity from free-text input. Non-numeric input keeps the
    /// previous quantity; parsed values are clamped to
    /// `1..=MAX_LINE_QUANTITY`.
    pub fn set_quantity_from_input(&mut self, input: &str) {
        if let Ok(parsed) = input.trim().parse::<u32>() {
            self.quantity = parsed.clamp(1, MAX_LINE_QUANTITY);
        }
    }
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of a product, merging with an existing line for the
    /// same product.
    pub fn add(&mut self, product_id: i32, product_name: impl Into<String>, unit_price: Decimal) {
        self.add_with_quantity(product_id, product_name, unit_price, 1);
    }

    /// Adds a product at a given quantity, merging duplicates. Quantities
    /// are clamped to `1..=MAX_LINE_QUANTITY`, and merging saturates at the
    /// cap rather than overflowing.
    pub fn add_with_quantity(
        &mut self,
        product_id: i32,
        product_name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) {
        let quantity = quantity.clamp(1, MAX_LINE_QUANTITY);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity).min(MAX_LINE_QUANTITY);
        } else {
            self.lines.push(CartLine {
                product_id,
                product_name: product_name.into(),
                unit_price,
                quantity,
            });
        }
    }

    pub fn remove(&mut self, product_id: i32) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line_mut(&mut self, product_id: i32) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_subtotal).sum()
    }
}

/// Derived checkout amounts, recomputed on demand from the cart and the
/// entered payment figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    /// subtotal - discount, unclamped
    pub total: Decimal,
    /// amount paid - total, unclamped
    pub change: Decimal,
}

impl CheckoutTotals {
    pub fn compute(cart: &Cart, discount: Decimal, amount_paid: Decimal) -> Self {
        let subtotal = cart.subtotal();
        let total = subtotal - discount;
        Self {
            subtotal,
            discount,
            total,
            change: amount_paid - total,
        }
    }
}

/// Pre-checkout validation, in order, first failure wins:
/// cart non-empty, amount paid covers the total (non-negative change), and
/// a reference number is present for non-cash payments. Runs before any
/// write.
pub fn validate_checkout(
    cart: &Cart,
    totals: &CheckoutTotals,
    method: PaymentMethod,
    reference_number: Option<&str>,
) -> Result<(), ServiceError> {
    if cart.is_empty() {
        return Err(ServiceError::InvalidOperation("Cart is empty".to_string()));
    }

    // change < 0 is exactly amount_paid < total
    if totals.change < Decimal::ZERO {
        let amount_paid = totals.total + totals.change;
        return Err(ServiceError::InsufficientPayment(format!(
            "amount paid {} is less than the total {}",
            amount_paid, totals.total
        )));
    }

    if method.requires_reference()
        && reference_number.map_or(true, |r| r.trim().is_empty())
    {
        return Err(ServiceError::InvalidInput(
            "a reference number is required for digital wallet payments".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn sample_cart() -> Cart {
        // two lines of quantity 2 at 150 and quantity 1 at 210
        let mut cart = Cart::new();
        cart.add_with_quantity(1, "Biscoff Cheesecake", dec!(150), 2);
        cart.add_with_quantity(2, "Funfetti", dec!(210), 1);
        cart
    }

    #[test]
    fn subtotal_sums_quantity_times_price() {
        assert_eq!(sample_cart().subtotal(), dec!(510));
    }

    #[test]
    fn adding_same_product_merges_lines() {
        let mut cart = sample_cart();
        cart.add(1, "Biscoff Cheesecake", dec!(150));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.subtotal(), dec!(660));
    }

    #[test]
    fn remove_drops_the_whole_line() {
        let mut cart = sample_cart();
        cart.remove(1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.subtotal(), dec!(210));
    }

    #[test]
    fn total_is_unclamped_when_discount_exceeds_subtotal() {
        let totals = CheckoutTotals::compute(&sample_cart(), dec!(600), dec!(0));
        assert_eq!(totals.total, dec!(-90));
        // negative totals never block checkout for non-negative paid amounts
        assert!(validate_checkout(&sample_cart(), &totals, PaymentMethod::Cash, None).is_ok());
    }

    #[test]
    fn change_is_amount_paid_minus_total() {
        let mut cart = Cart::new();
        cart.add_with_quantity(8, "Special Crinkles", dec!(90), 1);
        let totals = CheckoutTotals::compute(&cart, dec!(0), dec!(100));
        assert_eq!(totals.total, dec!(90));
        assert_eq!(totals.change, dec!(10));
    }

    #[test]
    fn merging_lines_saturates_at_the_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_with_quantity(1, "Banana Bread", dec!(120), u32::MAX);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);

        // a further merge must not overflow or exceed the cap
        cart.add_with_quantity(1, "Banana Bread", dec!(120), u32::MAX);
        assert_eq!(cart.lines()[0].quantity, MAX_LINE_QUANTITY);
        assert_eq!(
            cart.subtotal(),
            Decimal::from(MAX_LINE_QUANTITY) * dec!(120)
        );
    }

    #[test]
    fn quantity_input_clamps_oversized_values() {
        let mut cart = sample_cart();
        let line = cart.line_mut(1).unwrap();
        line.set_quantity_from_input("4294967295");
        assert_eq!(line.quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn quantity_input_keeps_previous_value_on_junk() {
        let mut cart = sample_cart();
        let line = cart.line_mut(1).unwrap();
        line.set_quantity_from_input("abc");
        assert_eq!(line.quantity, 2);
        line.set_quantity_from_input("-3");
        assert_eq!(line.quantity, 2);
        line.set_quantity_from_input("5");
        assert_eq!(line.quantity, 5);
        line.set_quantity_from_input("0");
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn empty_cart_is_rejected_first() {
        let cart = Cart::new();
        let totals = CheckoutTotals::compute(&cart, dec!(0), dec!(0));
        // even with an otherwise-invalid wallet payment, the empty cart wins
        let err =
            validate_checkout(&cart, &totals, PaymentMethod::DigitalWallet, None).unwrap_err();
        assert_matches!(err, ServiceError::InvalidOperation(_));
    }

    #[test]
    fn insufficient_payment_is_rejected() {
        let cart = sample_cart();
        let totals = CheckoutTotals::compute(&cart, dec!(0), dec!(100));
        let err = validate_checkout(&cart, &totals, PaymentMethod::Cash, None).unwrap_err();
        assert_matches!(err, ServiceError::InsufficientPayment(_));
    }

    #[test]
    fn wallet_without_reference_is_rejected() {
        let cart = sample_cart();
        let totals = CheckoutTotals::compute(&cart, dec!(0), dec!(600));
        let err = validate_checkout(&cart, &totals, PaymentMethod::DigitalWallet, Some("   "))
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(_));

        assert!(validate_checkout(
            &cart,
            &totals,
            PaymentMethod::DigitalWallet,
            Some("GC-12345")
        )
        .is_ok());
    }

    #[test]
    fn cart_round_trips_through_serde() {
        let cart = sample_cart();
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
