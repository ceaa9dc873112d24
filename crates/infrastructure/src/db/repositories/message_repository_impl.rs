//! 消息 Repository 的 PostgreSQL 实现

use async_trait::async_trait;
use domain::{Message, MessageRepository, MessageType, RepositoryError, Timestamp};
use sqlx::FromRow;
use uuid::Uuid;

use super::storage_error;
use crate::db::DbPool;

/// 数据库消息模型
#[derive(Debug, Clone, FromRow)]
struct DbMessage {
    id: Uuid,
    sender: String,
    recipient: String,
    text: String,
    message_type: String,
    sent_at: Timestamp,
}

impl From<DbMessage> for Message {
    fn from(row: DbMessage) -> Self {
        Message {
            id: row.id,
            from: row.sender,
            to: row.recipient,
            text: row.text,
            // 表中的类型都是经由实体写入的合法线上值
            message_type: MessageType::parse(&row.message_type).unwrap_or(MessageType::Message),
            sent_at: row.sent_at,
        }
    }
}

pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, message: Message) -> Result<Message, RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (id, sender, recipient, text, message_type, sent_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.message_type.as_str())
        .bind(message.sent_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(message)
    }

    async fn list_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbMessage>(
            "SELECT id, sender, recipient, text, message_type, sent_at \
             FROM messages ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }
}
