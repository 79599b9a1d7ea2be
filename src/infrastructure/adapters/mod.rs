pub mod http_payment_gateway;
pub mod mysql_order_repository;
pub mod mysql_outbox_publisher;
pub mod system_clock;

pub use http_payment_gateway::HttpPaymentGateway;
pub use mysql_order_repository::MySqlOrderRepository;
pub use mysql_outbox_publisher::MySqlOutboxPublisher;
pub use system_clock::SystemClock;
