use crate::domain::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use thiserror::Error;

/// 订单仓储错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 订单不存在
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// 并发修改冲突（状态已被其他请求改变）
    #[error("Conflicting update for order {order_id}: {message}")]
    Conflict { order_id: OrderId, message: String },

    /// 存储层错误
    #[error("Storage error: {0}")]
    Storage(String),

    /// 存储中的数据无法还原为订单
    #[error("Corrupt order record {order_id}: {message}")]
    Corrupt { order_id: OrderId, message: String },

    /// 调用被取消
    #[error("Repository call cancelled")]
    Cancelled,
}

/// 订单仓储端口接口
///
/// 实现方需保证 `update_status` 只在一致的前置状态下成功，
/// 否则返回 [`RepositoryError::Conflict`]。
#[async_trait]
pub trait OrderRepositoryPort: Send + Sync {
    /// 根据ID查找订单
    async fn find(&self, id: &OrderId) -> Result<Order, RepositoryError>;

    /// 更新订单状态
    async fn update_status(&self, id: &OrderId, status: OrderStatus)
        -> Result<(), RepositoryError>;
}
