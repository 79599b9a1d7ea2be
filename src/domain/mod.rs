pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use entities::Order;
pub use errors::DomainError;
pub use events::*;
pub use value_objects::{Money, OrderId, OrderStatus, PaymentReference};
