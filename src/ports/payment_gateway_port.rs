use crate::domain::{Money, PaymentReference};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 扣款回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeReceipt {
    /// 支付方返回的扣款ID，对账时使用
    pub charge_id: String,
}

/// 支付错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// 支付方拒绝扣款
    #[error("Charge declined: {0}")]
    Declined(String),

    /// 支付方暂不可用
    #[error("Payment provider unavailable: {0}")]
    Unavailable(String),

    /// 网络或协议错误
    #[error("Payment transport error: {0}")]
    Transport(String),
}

/// 支付网关端口接口
#[async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    /// 扣款
    async fn charge(
        &self,
        reference: &PaymentReference,
        amount: Money,
    ) -> Result<ChargeReceipt, PaymentError>;
}
