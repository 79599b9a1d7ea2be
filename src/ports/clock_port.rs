use chrono::{DateTime, Utc};

/// 时钟端口接口
pub trait ClockPort: Send + Sync {
    /// 当前时间
    fn now(&self) -> DateTime<Utc>;
}
