//! 参与者实体定义

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// 房间参与者
///
/// `name` 在房间内唯一，同时也是调用方后续请求携带的身份标识。
/// 记录由注册表在进入房间时创建，此后只有心跳会修改它，
/// 移除只发生在收割器驱逐时。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub last_heartbeat: Timestamp,
}

impl Participant {
    pub fn new(name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            name: name.into(),
            last_heartbeat: now,
        }
    }

    /// 刷新心跳时间戳，重置驱逐时钟
    pub fn touch(&mut self, now: Timestamp) {
        self.last_heartbeat = now;
    }

    /// 是否已超过 TTL 未发送心跳（`last_heartbeat + ttl < now`）
    pub fn is_stale(&self, now: Timestamp, ttl: chrono::TimeDelta) -> bool {
        self.last_heartbeat + ttl < now
    }
}
