pub mod catalog;
pub mod checkout;
pub mod events;
