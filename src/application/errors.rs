use crate::domain::{DomainError, OrderId};
use crate::ports::{ChargeReceipt, PaymentError, RepositoryError};
use std::fmt;
use thiserror::Error;

/// 结账流程中的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Find,
    Charge,
    UpdateStatus,
    Publish,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStage::Find => write!(f, "find"),
            CheckoutStage::Charge => write!(f, "charge"),
            CheckoutStage::UpdateStatus => write!(f, "update_status"),
            CheckoutStage::Publish => write!(f, "publish"),
        }
    }
}

/// 结账错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// 订单不存在
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// 业务规则拒绝（状态不对或已过期）
    #[error("Checkout rejected for order {order_id}: {source}")]
    Rejected {
        order_id: OrderId,
        source: DomainError,
    },

    /// 扣款失败，订单仍为待支付，可整体重试
    #[error("Payment failed for order {order_id}: {source}")]
    PaymentFailed {
        order_id: OrderId,
        source: PaymentError,
    },

    /// 已扣款但状态未能持久化，需要对账，不能直接重试
    #[error(
        "Order {order_id} was charged ({}) but its status was not persisted: {source}",
        .receipt.charge_id
    )]
    PostChargePersistenceFailed {
        order_id: OrderId,
        receipt: ChargeReceipt,
        source: RepositoryError,
    },

    /// 扣款前的仓储错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// 调用方取消，未进入后续步骤
    #[error("Checkout of order {order_id} cancelled during {stage}")]
    Cancelled {
        order_id: OrderId,
        stage: CheckoutStage,
    },
}

impl CheckoutError {
    /// 重新执行整个结账是否安全
    pub fn is_retryable(&self) -> bool {
        match self {
            CheckoutError::NotFound(_) => false,
            CheckoutError::Rejected { .. } => false,
            CheckoutError::PaymentFailed { source, .. } => {
                !matches!(source, PaymentError::Declined(_))
            }
            CheckoutError::PostChargePersistenceFailed { .. } => false,
            CheckoutError::Repository(source) => !matches!(
                source,
                RepositoryError::Conflict { .. } | RepositoryError::Corrupt { .. }
            ),
            // 扣款请求可能已到达支付方，结果未知
            CheckoutError::Cancelled { stage, .. } => *stage != CheckoutStage::Charge,
        }
    }

    /// 是否需要对账流程介入
    pub fn requires_reconciliation(&self) -> bool {
        matches!(self, CheckoutError::PostChargePersistenceFailed { .. })
    }
}
