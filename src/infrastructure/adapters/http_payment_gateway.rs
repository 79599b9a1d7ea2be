use crate::domain::{Money, PaymentReference};
use crate::infrastructure::config::PaymentGatewayConfig;
use crate::ports::payment_gateway_port::{ChargeReceipt, PaymentError, PaymentGatewayPort};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, error};

type HmacSha256 = Hmac<Sha256>;

/// 支付方扣款响应
#[derive(Debug, Deserialize)]
struct ChargeResponseBody {
    id: String,
}

/// HTTP支付网关适配器
#[derive(Clone)]
pub struct HttpPaymentGateway {
    config: Arc<PaymentGatewayConfig>,
    client: Client,
}

impl HttpPaymentGateway {
    pub fn new(config: Arc<PaymentGatewayConfig>) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

/// 生成签名：HMAC-SHA256(timestamp + "\n" + body)，十六进制编码
fn sign(secret: &str, timestamp: &str, body: &str) -> Result<String, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Transport(format!("Invalid signing key: {}", e)))?;
    mac.update(timestamp.as_bytes());
    mac.update(b"\n");
    mac.update(body.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// 根据HTTP状态码区分拒绝和不可用
fn classify_failure(status: StatusCode, body: String) -> PaymentError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        PaymentError::Unavailable(format!("{}: {}", status, body))
    } else {
        PaymentError::Declined(format!("{}: {}", status, body))
    }
}

#[async_trait]
impl PaymentGatewayPort for HttpPaymentGateway {
    /// 扣款
    async fn charge(
        &self,
        reference: &PaymentReference,
        amount: Money,
    ) -> Result<ChargeReceipt, PaymentError> {
        let url = format!("{}/v1/charges", self.config.base_url);

        let body = json!({
            "reference": reference.as_str(),
            "amount": amount.minor_units(),
        })
        .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&self.config.signing_secret, &timestamp, &body)?;

        debug!("Sending charge request of {} to {}", amount, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("X-Timestamp", timestamp)
            .header("X-Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Payment API error: {} - {}", status, error_text);
            return Err(classify_failure(status, error_text));
        }

        let body: ChargeResponseBody = response
            .json()
            .await
            .map_err(|e| PaymentError::Transport(format!("Invalid charge response: {}", e)))?;

        Ok(ChargeReceipt { charge_id: body.id })
    }
}
