pub mod category;
pub mod event;
pub mod event_type;
pub mod order_detail;
pub mod payment_record;
pub mod product;
pub mod schedule;
pub mod transaction;

pub use category::Entity as Category;
pub use event::Entity as Event;
pub use event_type::Entity as EventType;
pub use order_detail::Entity as OrderDetail;
pub use payment_record::Entity as PaymentRecord;
pub use product::Entity as Product;
pub use schedule::Entity as Schedule;
pub use transaction::Entity as Transaction;
