//! 存储引擎选择与核心服务装配
//!
//! 配置了 DATABASE_URL 时使用 PostgreSQL，否则退回内存引擎。
//! 连接建立失败直接向入口透出（快速失败）。

use std::sync::Arc;

use application::{
    Clock, InMemoryMessageRepository, InMemoryParticipantRepository, MessageStore,
    ParticipantRegistry, PresenceReaper, ReaperConfig, SystemClock,
};
use config::AppConfig;
use domain::{MessageRepository, ParticipantRepository};
use thiserror::Error;

use crate::db::{self, DbPool};
use crate::db::repositories::{PgMessageRepository, PgParticipantRepository};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 装配完成的核心服务集合
pub struct CoreServices {
    pub registry: Arc<ParticipantRegistry>,
    pub messages: Arc<MessageStore>,
    pub reaper: Arc<PresenceReaper>,
    /// 持有连接池以便入口在关闭时释放；内存引擎下为 `None`
    pub pool: Option<DbPool>,
}

pub async fn build_services(config: &AppConfig) -> Result<CoreServices, BuildError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let participants: Arc<dyn ParticipantRepository>;
    let message_repo: Arc<dyn MessageRepository>;
    let pool = match &config.database.url {
        Some(url) => {
            let pool = db::create_pg_pool(url, config.database.max_connections).await?;
            db::ensure_schema(&pool).await?;
            tracing::info!("已连接 PostgreSQL 存储引擎");
            participants = Arc::new(PgParticipantRepository::new(pool.clone()));
            message_repo = Arc::new(PgMessageRepository::new(pool.clone()));
            Some(pool)
        }
        None => {
            tracing::info!("未配置 DATABASE_URL，使用内存存储引擎");
            participants = Arc::new(InMemoryParticipantRepository::default());
            message_repo = Arc::new(InMemoryMessageRepository::default());
            None
        }
    };

    let messages = Arc::new(MessageStore::new(
        message_repo,
        participants.clone(),
        clock.clone(),
        config.chat.broadcast_token.clone(),
    ));
    let registry = Arc::new(ParticipantRegistry::new(
        participants,
        messages.clone(),
        clock.clone(),
    ));
    let reaper = Arc::new(PresenceReaper::new(
        registry.clone(),
        messages.clone(),
        clock,
        ReaperConfig {
            ttl: config.presence.ttl(),
            sweep_interval: config.presence.sweep_interval(),
        },
    ));

    Ok(CoreServices {
        registry,
        messages,
        reaper,
        pool,
    })
}
