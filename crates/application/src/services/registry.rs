//! 参与者注册表
//!
//! 参与者存在性、唯一性与心跳时间戳的唯一写入方。
//! 驱逐只由在场收割器经 `evict_if_stale` 发起。

use std::sync::Arc;

use domain::{Participant, ParticipantRepository, RepositoryError, Timestamp};
use tracing::info;

use crate::clock::Clock;
use crate::error::{ApplicationError, ApplicationResult};
use crate::services::MessageStore;
use crate::validation::JoinRequest;

pub struct ParticipantRegistry {
    participants: Arc<dyn ParticipantRepository>,
    messages: Arc<MessageStore>,
    clock: Arc<dyn Clock>,
}

impl ParticipantRegistry {
    pub fn new(
        participants: Arc<dyn ParticipantRepository>,
        messages: Arc<MessageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            participants,
            messages,
            clock,
        }
    }

    /// 进入房间
    ///
    /// 名字未通过校验返回 `InvalidInput`，同名参与者在场返回 `Conflict`。
    /// 入场通知严格发生在参与者记录落库之后；落库失败则不产生通知。
    pub async fn join(&self, request: JoinRequest) -> ApplicationResult<Participant> {
        let violations = request.validate();
        if !violations.is_empty() {
            return Err(ApplicationError::InvalidInput(violations));
        }

        let participant = Participant::new(request.name, self.clock.now());
        match self.participants.insert(participant.clone()).await {
            Ok(()) => {}
            Err(RepositoryError::DuplicateKey) => {
                return Err(ApplicationError::Conflict(format!(
                    "参与者已在场: {}",
                    participant.name
                )));
            }
            Err(err) => return Err(err.into()),
        }

        self.messages
            .append_system(
                &participant.name,
                format!("{} joins the room", participant.name),
            )
            .await?;

        info!(name = %participant.name, "参与者进入房间");
        Ok(participant)
    }

    pub async fn list(&self) -> ApplicationResult<Vec<Participant>> {
        Ok(self.participants.list_all().await?)
    }

    /// 心跳：唯一能重置驱逐资格的路径
    pub async fn heartbeat(&self, name: &str) -> ApplicationResult<()> {
        match self.participants.update_heartbeat(name, self.clock.now()).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ApplicationError::NotFound(format!(
                "参与者不在场: {name}"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// 发送者授权依据：名字是否对应一个在场参与者
    pub async fn exists(&self, name: &str) -> ApplicationResult<bool> {
        Ok(self.participants.find_by_name(name).await?.is_some())
    }

    /// 仅当存储中的心跳仍早于 `stale_before` 时移除参与者，返回是否移除。
    /// 与并发心跳的竞争由存储层的比较并删除仲裁，心跳获胜。
    pub async fn evict_if_stale(
        &self,
        name: &str,
        stale_before: Timestamp,
    ) -> ApplicationResult<bool> {
        let removed = self.participants.delete_if_stale(name, stale_before).await?;
        if removed {
            info!(name = %name, "参与者已被驱逐");
        }
        Ok(removed)
    }
}
