//! 内存存储引擎
//!
//! 两个 Repository 接口的参考实现，用于测试以及未配置数据库的部署。
//! 写路径全部在写锁内完成一次检查加变更，满足 `insert` 与
//! `delete_if_stale` 的原子契约。

use async_trait::async_trait;
use domain::{
    Message, MessageRepository, Participant, ParticipantRepository, RepositoryError, Timestamp,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryParticipantRepository {
    participants: RwLock<HashMap<String, Participant>>,
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        Ok(self.participants.read().await.get(name).cloned())
    }

    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut participants = self.participants.write().await;
        if participants.contains_key(&participant.name) {
            return Err(RepositoryError::DuplicateKey);
        }
        participants.insert(participant.name.clone(), participant);
        Ok(())
    }

    async fn update_heartbeat(&self, name: &str, at: Timestamp) -> Result<(), RepositoryError> {
        let mut participants = self.participants.write().await;
        match participants.get_mut(name) {
            Some(participant) => {
                participant.touch(at);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_if_stale(
        &self,
        name: &str,
        stale_before: Timestamp,
    ) -> Result<bool, RepositoryError> {
        // 检查与删除持有同一把写锁，并发心跳要么在此之前生效
        // （时间戳已刷新，删除被放弃），要么排在锁后
        let mut participants = self.participants.write().await;
        match participants.get(name) {
            Some(participant) if participant.last_heartbeat < stale_before => {
                participants.remove(name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.participants.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, message: Message) -> Result<Message, RepositoryError> {
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn list_all(&self) -> Result<Vec<Message>, RepositoryError> {
        Ok(self.messages.read().await.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut messages = self.messages.write().await;
        match messages.iter().position(|m| m.id == id) {
            Some(index) => {
                messages.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
