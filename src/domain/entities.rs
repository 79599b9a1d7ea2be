use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OrderId, OrderStatus, PaymentReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 订单实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// 订单ID
    pub id: OrderId,

    /// 订单状态
    pub status: OrderStatus,

    /// 订单金额（最小货币单位）
    pub amount: Money,

    /// 过期时间
    pub expire_at: DateTime<Utc>,

    /// 支付凭证
    pub payment_reference: PaymentReference,
}

/// 结账决策：编排器下一步要做什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutDecision {
    /// 持久化时使用的目标状态
    pub next_status: OrderStatus,

    /// 持久化前是否需要扣款
    pub need_charge: bool,
}

impl Order {
    /// 从存储中恢复订单
    pub fn new(
        id: OrderId,
        status: OrderStatus,
        amount: Money,
        expire_at: DateTime<Utc>,
        payment_reference: PaymentReference,
    ) -> DomainResult<Self> {
        if id.as_str().is_empty() {
            return Err(DomainError::Validation(
                "Order id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            status,
            amount,
            expire_at,
            payment_reference,
        })
    }

    /// 判断订单能否结账。纯函数，不修改订单。
    ///
    /// 先检查状态，再检查过期时间；`now == expire_at` 仍可结账。
    pub fn decide_checkout(&self, now: DateTime<Utc>) -> DomainResult<CheckoutDecision> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::InvalidStatus {
                actual: self.status,
            });
        }

        if now > self.expire_at {
            return Err(DomainError::Expired {
                expire_at: self.expire_at,
                now,
            });
        }

        Ok(CheckoutDecision {
            next_status: OrderStatus::Paid,
            need_charge: true,
        })
    }
}
