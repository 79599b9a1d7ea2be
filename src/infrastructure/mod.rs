pub mod adapters;
pub mod config;

pub use adapters::{HttpPaymentGateway, MySqlOrderRepository, MySqlOutboxPublisher, SystemClock};
pub use config::AppConfig;
