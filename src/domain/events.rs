use crate::domain::value_objects::OrderId;
use serde::{Deserialize, Serialize};

/// 领域事件trait
pub trait DomainEvent: Serialize {
    /// 发布时使用的主题
    fn topic(&self) -> &'static str;

    /// 事件载荷
    fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// 订单已支付事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPaid {
    pub order_id: OrderId,
}

impl OrderPaid {
    pub const TOPIC: &'static str = "order.paid";

    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

impl DomainEvent for OrderPaid {
    fn topic(&self) -> &'static str {
        Self::TOPIC
    }
}
