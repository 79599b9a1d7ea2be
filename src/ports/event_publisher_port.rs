use async_trait::async_trait;
use thiserror::Error;

/// 事件发布错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// 消息系统拒绝了事件
    #[error("Event rejected on topic {topic}: {message}")]
    Rejected { topic: String, message: String },

    /// 网络或存储错误
    #[error("Publish transport error: {0}")]
    Transport(String),

    /// 调用被取消
    #[error("Publish cancelled")]
    Cancelled,
}

/// 事件发布端口接口
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// 发布事件
    async fn publish(&self, topic: &str, payload: &serde_json::Value)
        -> Result<(), PublishError>;
}
