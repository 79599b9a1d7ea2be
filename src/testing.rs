//! 测试用的端口替身，按调用顺序记录每次端口调用。

use crate::application::CheckoutUsecase;
use crate::domain::{Money, Order, OrderId, OrderStatus, PaymentReference};
use crate::ports::{
    ChargeReceipt, ClockPort, EventPublisherPort, OrderRepositoryPort, PaymentError,
    PaymentGatewayPort, PublishError, RepositoryError,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub type TestUsecase = CheckoutUsecase<FakeRepository, FakePayment, FakePublisher, FixedClock>;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn order(status: OrderStatus, expire_at: DateTime<Utc>) -> Order {
    Order::new(
        OrderId::new("ORDER123"),
        status,
        Money::from_minor_units(1000),
        expire_at,
        PaymentReference::new("tok_123"),
    )
    .unwrap()
}

pub struct FakeRepository {
    pub order: Option<Order>,
    pub find_error: Option<RepositoryError>,
    pub update_error: Option<RepositoryError>,
    pub cancel_on_update: Option<CancellationToken>,
    calls: CallLog,
}

#[async_trait]
impl OrderRepositoryPort for FakeRepository {
    async fn find(&self, id: &OrderId) -> Result<Order, RepositoryError> {
        self.calls.lock().unwrap().push(format!("find:{}", id));
        if let Some(e) = &self.find_error {
            return Err(e.clone());
        }
        self.order
            .clone()
            .filter(|order| &order.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("update_status:{}:{}", id, status));
        if let Some(token) = &self.cancel_on_update {
            token.cancel();
            std::future::pending::<()>().await;
        }
        match &self.update_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub struct FakePayment {
    pub error: Option<PaymentError>,
    pub cancel_on_charge: Option<CancellationToken>,
    calls: CallLog,
}

#[async_trait]
impl PaymentGatewayPort for FakePayment {
    async fn charge(
        &self,
        reference: &PaymentReference,
        amount: Money,
    ) -> Result<ChargeReceipt, PaymentError> {
        self.calls.lock().unwrap().push(format!(
            "charge:{}:{}",
            reference.as_str(),
            amount.minor_units()
        ));
        if let Some(token) = &self.cancel_on_charge {
            token.cancel();
            std::future::pending::<()>().await;
        }
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(ChargeReceipt {
                charge_id: "ch_1".to_string(),
            }),
        }
    }
}

pub struct FakePublisher {
    pub error: Option<PublishError>,
    pub cancel_on_publish: Option<CancellationToken>,
    calls: CallLog,
}

#[async_trait]
impl EventPublisherPort for FakePublisher {
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> Result<(), PublishError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("publish:{}:{}", topic, payload));
        if let Some(token) = &self.cancel_on_publish {
            token.cancel();
            std::future::pending::<()>().await;
        }
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 默认一切成功的测试夹具
pub struct Fixture {
    pub repository: FakeRepository,
    pub payment: FakePayment,
    pub publisher: FakePublisher,
    calls: CallLog,
}

impl Fixture {
    pub fn new(order: Option<Order>) -> Self {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        Self {
            repository: FakeRepository {
                order,
                find_error: None,
                update_error: None,
                cancel_on_update: None,
                calls: calls.clone(),
            },
            payment: FakePayment {
                error: None,
                cancel_on_charge: None,
                calls: calls.clone(),
            },
            publisher: FakePublisher {
                error: None,
                cancel_on_publish: None,
                calls: calls.clone(),
            },
            calls,
        }
    }

    /// 一小时后过期的待支付订单
    pub fn pending() -> Self {
        Self::new(Some(order(OrderStatus::Pending, now() + Duration::hours(1))))
    }

    pub fn into_usecase(self) -> (TestUsecase, CallLog) {
        let usecase = CheckoutUsecase::new(
            Arc::new(self.repository),
            Arc::new(self.payment),
            Arc::new(self.publisher),
            Arc::new(FixedClock(now())),
        );
        (usecase, self.calls)
    }
}
