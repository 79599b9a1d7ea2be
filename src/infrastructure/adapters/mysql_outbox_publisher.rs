use crate::ports::event_publisher_port::{EventPublisherPort, PublishError};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 基于发件箱表的事件发布实现，由外部中继投递到消息系统
///
/// 期望的表结构：
/// `outbox_events(id CHAR(36) PRIMARY KEY, topic VARCHAR, payload JSON, created_at DATETIME)`
#[derive(Clone)]
pub struct MySqlOutboxPublisher {
    pool: Arc<Pool<MySql>>,
}

impl MySqlOutboxPublisher {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventPublisherPort for MySqlOutboxPublisher {
    async fn publish(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        if topic.is_empty() {
            return Err(PublishError::Rejected {
                topic: topic.to_string(),
                message: "topic must not be empty".to_string(),
            });
        }

        let event_id = Uuid::new_v4();
        let query = r#"
            INSERT INTO outbox_events (id, topic, payload, created_at)
            VALUES (?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(event_id.to_string())
            .bind(topic)
            .bind(Json(payload))
            .bind(chrono::Utc::now())
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        debug!("Event {} queued on topic {}", event_id, topic);
        Ok(())
    }
}
