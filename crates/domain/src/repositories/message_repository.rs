//! 消息集合的抽象存储接口

use crate::{Message, RepositoryError};
use async_trait::async_trait;
use uuid::Uuid;

/// 消息 Repository
///
/// 消息存储服务是消息状态的唯一写入方。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// 持久化一条消息，返回落库后的消息
    async fn insert(&self, message: Message) -> Result<Message, RepositoryError>;

    /// 全部消息，按创建时序排列
    async fn list_all(&self) -> Result<Vec<Message>, RepositoryError>;

    /// 按ID删除，返回是否真正删除
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepositoryError>;
}
