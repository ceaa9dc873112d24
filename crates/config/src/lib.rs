//! 统一配置中心
//!
//! 提供应用的全局配置，包括：
//! - 数据库连接
//! - 在场跟踪（TTL 与扫描间隔）
//! - 聊天（广播保留值）
//!
//! 所有配置在启动时从环境变量读取一次，之后只读。

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 在场跟踪配置
    pub presence: PresenceConfig,
    /// 聊天配置
    pub chat: ChatConfig,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 连接串；未设置时回退到内存存储引擎
    pub url: Option<String>,
    pub max_connections: u32,
}

/// 在场跟踪配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// 无心跳多少秒后有资格被驱逐
    pub ttl_secs: u64,
    /// 收割器两次扫描的间隔秒数
    pub sweep_interval_secs: u64,
}

impl PresenceConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// 聊天配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// 广播目的地保留值，表示"发给房间里的所有人"
    pub broadcast_token: String,
}

impl AppConfig {
    /// 从环境变量加载配置；所有项都有可用的默认值
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok(),
                max_connections: env_parse("DB_MAX_CONNECTIONS", 5),
            },
            presence: PresenceConfig {
                ttl_secs: env_parse("PRESENCE_TTL_SECS", 10),
                sweep_interval_secs: env_parse("PRESENCE_SWEEP_INTERVAL_SECS", 15),
            },
            chat: ChatConfig {
                broadcast_token: env::var("BROADCAST_TOKEN")
                    .unwrap_or_else(|_| "Todos".to_string()),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
            },
            presence: PresenceConfig {
                ttl_secs: 10,
                sweep_interval_secs: 15,
            },
            chat: ChatConfig {
                broadcast_token: "Todos".to_string(),
            },
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
