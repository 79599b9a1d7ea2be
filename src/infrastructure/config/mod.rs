pub mod app_config;
pub mod payment_gateway_config;

pub use app_config::AppConfig;
pub use payment_gateway_config::PaymentGatewayConfig;
