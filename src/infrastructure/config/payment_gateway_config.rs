use crate::infrastructure::config::app_config::{parse_or, required, ConfigError};
use std::time::Duration;

/// 支付网关配置
#[derive(Clone)]
pub struct PaymentGatewayConfig {
    /// API基础URL
    pub base_url: String,

    /// API密钥
    pub api_key: String,

    /// 请求签名密钥（HMAC-SHA256）
    pub signing_secret: String,

    /// 请求超时
    pub timeout: Duration,
}

impl std::fmt::Debug for PaymentGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGatewayConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PaymentGatewayConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = parse_or(lookup, "PAYMENT_TIMEOUT_SECS", 10u64)?;

        Ok(Self {
            base_url: required(lookup, "PAYMENT_BASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            api_key: required(lookup, "PAYMENT_API_KEY")?,
            signing_secret: required(lookup, "PAYMENT_SIGNING_SECRET")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
