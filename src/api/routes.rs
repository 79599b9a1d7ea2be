use super::handlers::*;
use crate::ports::{ClockPort, EventPublisherPort, OrderRepositoryPort, PaymentGatewayPort};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router<R, P, E, C>(state: AppState<R, P, E, C>) -> Router
where
    R: OrderRepositoryPort + 'static,
    P: PaymentGatewayPort + 'static,
    E: EventPublisherPort + 'static,
    C: ClockPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/orders/:order_id/checkout",
            post(checkout::<R, P, E, C>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
