use crate::domain::{Money, Order, OrderId, OrderStatus, PaymentReference};
use crate::ports::order_repository_port::{OrderRepositoryPort, RepositoryError};
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, warn};

/// MySQL订单仓储实现
///
/// 期望的表结构：
/// `orders(id VARCHAR PRIMARY KEY, status VARCHAR, amount_minor BIGINT UNSIGNED,
/// expire_at DATETIME, payment_reference VARCHAR, updated_at DATETIME)`
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlOrderRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

/// 只有待支付订单可以被更新，其他状态一律视为冲突
const UPDATE_STATUS_SQL: &str = r#"
    UPDATE orders
    SET status = ?, updated_at = ?
    WHERE id = ? AND status = ?
"#;

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        RepositoryError::Storage(e.to_string())
    }
}

#[async_trait]
impl OrderRepositoryPort for MySqlOrderRepository {
    /// 根据ID查找订单
    async fn find(&self, id: &OrderId) -> Result<Order, RepositoryError> {
        let query = r#"
            SELECT id, status, amount_minor, expire_at, payment_reference
            FROM orders
            WHERE id = ?
        "#;

        let row = sqlx::query_as::<_, OrderRow>(query)
            .bind(id.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;

        match row {
            Some(row) => row.into_order(),
            None => Err(RepositoryError::NotFound(id.clone())),
        }
    }

    /// 条件更新：仅当订单仍为待支付时生效，否则返回 NotFound 或 Conflict
    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let rows_affected = sqlx::query(UPDATE_STATUS_SQL)
            .bind(status.to_string())
            .bind(chrono::Utc::now())
            .bind(id.as_str())
            .bind(OrderStatus::Pending.to_string())
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            let current: Option<(String,)> =
                sqlx::query_as("SELECT status FROM orders WHERE id = ?")
                    .bind(id.as_str())
                    .fetch_optional(self.pool.as_ref())
                    .await?;

            return Err(match current {
                None => RepositoryError::NotFound(id.clone()),
                Some((current,)) => {
                    warn!("Order {} is {}, refusing update to {}", id, current, status);
                    RepositoryError::Conflict {
                        order_id: id.clone(),
                        message: format!("order is {}, expected {}", current, OrderStatus::Pending),
                    }
                }
            });
        }

        debug!("Order {} status updated to {}", id, status);
        Ok(())
    }
}

/// 数据库行结构体
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    status: String,
    amount_minor: u64,
    expire_at: chrono::DateTime<chrono::Utc>,
    payment_reference: String,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let order_id = OrderId::new(self.id);

        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepositoryError::Corrupt {
                order_id: order_id.clone(),
                message: e.to_string(),
            })?;

        if self.payment_reference.is_empty() {
            return Err(RepositoryError::Corrupt {
                order_id,
                message: "payment reference is empty".to_string(),
            });
        }

        Order::new(
            order_id.clone(),
            status,
            Money::from_minor_units(self.amount_minor),
            self.expire_at,
            PaymentReference::new(self.payment_reference),
        )
        .map_err(|e| RepositoryError::Corrupt {
            order_id,
            message: e.to_string(),
        })
    }
}
