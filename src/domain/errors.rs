use crate::domain::value_objects::OrderStatus;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 领域层错误类型（业务规则拒绝）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 订单状态不是待支付
    #[error("Invalid order status: expected pending, got {actual}")]
    InvalidStatus { actual: OrderStatus },

    /// 订单已过期
    #[error("Order expired at {expire_at}, checkout attempted at {now}")]
    Expired {
        expire_at: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(String),
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;
