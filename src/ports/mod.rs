pub mod clock_port;
pub mod event_publisher_port;
pub mod order_repository_port;
pub mod payment_gateway_port;

pub use clock_port::ClockPort;
pub use event_publisher_port::{EventPublisherPort, PublishError};
pub use order_repository_port::{OrderRepositoryPort, RepositoryError};
pub use payment_gateway_port::{ChargeReceipt, PaymentError, PaymentGatewayPort};
