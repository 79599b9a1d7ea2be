use crate::application::checkout_usecase::CheckoutOutcome;
use serde::{Deserialize, Serialize};

/// 结账响应
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckoutResponse {
    /// 订单ID
    pub order_id: String,

    /// 订单状态
    pub status: String,

    /// 扣款ID
    pub charge_id: Option<String>,

    /// 非致命警告（例如事件发布失败）
    pub warning: Option<String>,
}

impl From<CheckoutOutcome> for CheckoutResponse {
    fn from(outcome: CheckoutOutcome) -> Self {
        Self {
            order_id: outcome.order_id.to_string(),
            status: outcome.status.to_string(),
            charge_id: outcome.charge.map(|receipt| receipt.charge_id),
            warning: outcome.publish_error.map(|e| e.to_string()),
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,

    /// 客户端能否直接重试结账
    pub retryable: bool,
}

impl ErrorResponse {
    pub fn new(error: String, message: String, retryable: bool) -> Self {
        Self {
            error,
            message,
            retryable,
        }
    }
}
