use crate::application::{CheckoutError, CheckoutResponse, CheckoutUsecase, ErrorResponse};
use crate::domain::{DomainError, OrderId};
use crate::ports::{ClockPort, EventPublisherPort, OrderRepositoryPort, PaymentGatewayPort};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// 应用状态
pub struct AppState<R, P, E, C>
where
    R: OrderRepositoryPort,
    P: PaymentGatewayPort,
    E: EventPublisherPort,
    C: ClockPort,
{
    pub checkout_usecase: Arc<CheckoutUsecase<R, P, E, C>>,

    /// 服务关闭时取消所有进行中的结账
    pub shutdown: CancellationToken,
}

impl<R, P, E, C> Clone for AppState<R, P, E, C>
where
    R: OrderRepositoryPort,
    P: PaymentGatewayPort,
    E: EventPublisherPort,
    C: ClockPort,
{
    fn clone(&self) -> Self {
        Self {
            checkout_usecase: self.checkout_usecase.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// 结账错误到HTTP状态码和错误码的映射
fn error_status(e: &CheckoutError) -> (StatusCode, &'static str) {
    match e {
        CheckoutError::NotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
        CheckoutError::Rejected {
            source: DomainError::Expired { .. },
            ..
        } => (StatusCode::CONFLICT, "ORDER_EXPIRED"),
        CheckoutError::Rejected { .. } => (StatusCode::CONFLICT, "INVALID_STATUS"),
        CheckoutError::PaymentFailed { .. } => (StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED"),
        CheckoutError::PostChargePersistenceFailed { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "RECONCILIATION_REQUIRED")
        }
        CheckoutError::Repository(_) => (StatusCode::SERVICE_UNAVAILABLE, "REPOSITORY_ERROR"),
        CheckoutError::Cancelled { .. } => (StatusCode::SERVICE_UNAVAILABLE, "CANCELLED"),
    }
}

/// 订单结账
pub async fn checkout<R, P, E, C>(
    State(state): State<AppState<R, P, E, C>>,
    Path(order_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)>
where
    R: OrderRepositoryPort,
    P: PaymentGatewayPort,
    E: EventPublisherPort,
    C: ClockPort,
{
    info!("Received checkout request: {}", order_id);

    let cancel = state.shutdown.child_token();

    state
        .checkout_usecase
        .checkout(&OrderId::new(order_id), &cancel)
        .await
        .map(|outcome| (StatusCode::OK, Json(CheckoutResponse::from(outcome))))
        .map_err(|e| {
            let (status, code) = error_status(&e);
            if e.requires_reconciliation() {
                error!("Checkout needs reconciliation: {}", e);
            } else if status.is_server_error() {
                error!("Checkout error: {}", e);
            } else {
                warn!("Checkout refused: {}", e);
            }
            (
                status,
                Json(ErrorResponse::new(
                    code.to_string(),
                    e.to_string(),
                    e.is_retryable(),
                )),
            )
        })
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::domain::OrderStatus;
    use crate::ports::{PaymentError, RepositoryError};
    use crate::testing::{now, order, Fixture};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Duration;
    use tower::ServiceExt;

    async fn post_checkout(fixture: Fixture, order_id: &str) -> (StatusCode, serde_json::Value) {
        post_checkout_with_shutdown(fixture, order_id, CancellationToken::new()).await
    }

    async fn post_checkout_with_shutdown(
        fixture: Fixture,
        order_id: &str,
        shutdown: CancellationToken,
    ) -> (StatusCode, serde_json::Value) {
        let (usecase, _) = fixture.into_usecase();
        let app = create_router(AppState {
            checkout_usecase: Arc::new(usecase),
            shutdown,
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/orders/{}/checkout", order_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_checkout_success() {
        let (status, body) = post_checkout(Fixture::pending(), "ORDER123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "order_id": "ORDER123",
                "status": "paid",
                "charge_id": "ch_1",
                "warning": null,
            })
        );
    }

    #[tokio::test]
    async fn test_unknown_order_is_404() {
        let (status, body) = post_checkout(Fixture::pending(), "MISSING").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "ORDER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_expired_order_is_409() {
        let fixture = Fixture::new(Some(order(OrderStatus::Pending, now() - Duration::hours(1))));

        let (status, body) = post_checkout(fixture, "ORDER123").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ORDER_EXPIRED");
    }

    #[tokio::test]
    async fn test_declined_payment_is_402() {
        let mut fixture = Fixture::pending();
        fixture.payment.error = Some(PaymentError::Declined("insufficient funds".to_string()));

        let (status, body) = post_checkout(fixture, "ORDER123").await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"], "PAYMENT_FAILED");
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn test_post_charge_failure_flags_reconciliation() {
        let mut fixture = Fixture::pending();
        fixture.repository.update_error = Some(RepositoryError::Storage("deadlock".to_string()));

        let (status, body) = post_checkout(fixture, "ORDER123").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "RECONCILIATION_REQUIRED");
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn test_shutdown_during_charge_is_not_retryable() {
        let shutdown = CancellationToken::new();
        let mut fixture = Fixture::pending();
        fixture.payment.cancel_on_charge = Some(shutdown.clone());

        let (status, body) = post_checkout_with_shutdown(fixture, "ORDER123", shutdown).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "CANCELLED");
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
