use crate::application::errors::{CheckoutError, CheckoutStage};
use crate::domain::{DomainEvent, OrderId, OrderPaid, OrderStatus};
use crate::ports::{
    ChargeReceipt, ClockPort, EventPublisherPort, OrderRepositoryPort, PaymentGatewayPort,
    PublishError, RepositoryError,
};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// 结账结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    pub order_id: OrderId,

    /// 已持久化的状态
    pub status: OrderStatus,

    /// 扣款回执（未扣款时为空）
    pub charge: Option<ChargeReceipt>,

    /// 事件发布失败不影响结账结果，仅作为警告返回
    pub publish_error: Option<PublishError>,
}

/// 结账用例：只负责步骤编排和错误传递
pub struct CheckoutUsecase<R, P, E, C>
where
    R: OrderRepositoryPort,
    P: PaymentGatewayPort,
    E: EventPublisherPort,
    C: ClockPort,
{
    repository: Arc<R>,
    payment: Arc<P>,
    publisher: Arc<E>,
    clock: Arc<C>,
}

/// 取消时丢弃进行中的调用，返回 `None`
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        output = call => Some(output),
    }
}

impl<R, P, E, C> CheckoutUsecase<R, P, E, C>
where
    R: OrderRepositoryPort,
    P: PaymentGatewayPort,
    E: EventPublisherPort,
    C: ClockPort,
{
    pub fn new(repository: Arc<R>, payment: Arc<P>, publisher: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            repository,
            payment,
            publisher,
            clock,
        }
    }

    /// 结账
    pub async fn checkout(
        &self,
        order_id: &OrderId,
        cancel: &CancellationToken,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        info!(order_id = %order_id, "Starting checkout");

        // 1. 查询订单
        let order = match until_cancelled(cancel, self.repository.find(order_id)).await {
            None => return Err(cancelled(order_id, CheckoutStage::Find)),
            Some(Err(RepositoryError::NotFound(id))) => {
                warn!(order_id = %id, "Order not found");
                return Err(CheckoutError::NotFound(id));
            }
            Some(Err(e)) => {
                error!(order_id = %order_id, error = %e, "Failed to load order");
                return Err(CheckoutError::Repository(e));
            }
            Some(Ok(order)) => order,
        };

        // 2. 业务判断
        let decision = order
            .decide_checkout(self.clock.now())
            .map_err(|source| {
                warn!(order_id = %order.id, reason = %source, "Checkout rejected");
                CheckoutError::Rejected {
                    order_id: order.id.clone(),
                    source,
                }
            })?;
        debug!(order_id = %order.id, ?decision, "Checkout decided");

        // 3. 扣款
        let receipt = if decision.need_charge {
            let charge = self.payment.charge(&order.payment_reference, order.amount);
            match until_cancelled(cancel, charge).await {
                None => return Err(cancelled(&order.id, CheckoutStage::Charge)),
                Some(Err(source)) => {
                    error!(order_id = %order.id, error = %source, "Charge failed");
                    return Err(CheckoutError::PaymentFailed {
                        order_id: order.id,
                        source,
                    });
                }
                Some(Ok(receipt)) => {
                    info!(
                        order_id = %order.id,
                        charge_id = %receipt.charge_id,
                        amount = %order.amount,
                        "Order charged"
                    );
                    Some(receipt)
                }
            }
        } else {
            None
        };

        // 4. 持久化状态
        let update = self.repository.update_status(&order.id, decision.next_status);
        let persisted = until_cancelled(cancel, update)
            .await
            .unwrap_or(Err(RepositoryError::Cancelled));

        if let Err(source) = persisted {
            return Err(match receipt {
                Some(receipt) => {
                    error!(
                        order_id = %order.id,
                        charge_id = %receipt.charge_id,
                        error = %source,
                        "Order charged but status not persisted, reconciliation required"
                    );
                    CheckoutError::PostChargePersistenceFailed {
                        order_id: order.id,
                        receipt,
                        source,
                    }
                }
                None if source == RepositoryError::Cancelled => {
                    cancelled(&order.id, CheckoutStage::UpdateStatus)
                }
                None => {
                    error!(order_id = %order.id, error = %source, "Failed to persist order status");
                    CheckoutError::Repository(source)
                }
            });
        }

        // 5. 发布事件（尽力而为）
        let event = OrderPaid::new(order.id.clone());
        let publish_error = match event.payload() {
            Err(e) => Some(PublishError::Rejected {
                topic: event.topic().to_string(),
                message: e.to_string(),
            }),
            Ok(payload) => {
                let publish = self.publisher.publish(event.topic(), &payload);
                match until_cancelled(cancel, publish).await {
                    None => Some(PublishError::Cancelled),
                    Some(result) => result.err(),
                }
            }
        };

        if let Some(e) = &publish_error {
            warn!(
                order_id = %order.id,
                topic = event.topic(),
                error = %e,
                "Order paid but event was not published"
            );
        }

        info!(order_id = %order.id, status = %decision.next_status, "Checkout completed");

        Ok(CheckoutOutcome {
            order_id: order.id,
            status: decision.next_status,
            charge: receipt,
            publish_error,
        })
    }
}

fn cancelled(order_id: &OrderId, stage: CheckoutStage) -> CheckoutError {
    warn!(order_id = %order_id, %stage, "Checkout cancelled");
    CheckoutError::Cancelled {
        order_id: order_id.clone(),
        stage,
    }
}
