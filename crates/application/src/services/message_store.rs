//! 消息存储服务
//!
//! 消息创建、受众过滤查询与删除的唯一写入方。
//! 发送者授权依据注册表拥有的参与者集合（同一存储协作方）。

use std::sync::Arc;

use domain::{Message, MessageRepository, MessageType, ParticipantRepository};
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{ApplicationError, ApplicationResult};
use crate::validation::{SendMessageRequest, Violation};

pub struct MessageStore {
    messages: Arc<dyn MessageRepository>,
    participants: Arc<dyn ParticipantRepository>,
    clock: Arc<dyn Clock>,
    broadcast_token: String,
}

impl MessageStore {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        participants: Arc<dyn ParticipantRepository>,
        clock: Arc<dyn Clock>,
        broadcast_token: impl Into<String>,
    ) -> Self {
        Self {
            messages,
            participants,
            clock,
            broadcast_token: broadcast_token.into(),
        }
    }

    /// 广播目的地保留值
    pub fn broadcast_token(&self) -> &str {
        &self.broadcast_token
    }

    /// 追加一条用户消息
    ///
    /// 负载未通过校验返回 `InvalidInput`（携带全部违规）；
    /// `from` 不是在场参与者返回 `Unauthorized`。
    pub async fn append(
        &self,
        from: &str,
        request: SendMessageRequest,
    ) -> ApplicationResult<Message> {
        let violations = request.validate();
        if !violations.is_empty() {
            return Err(ApplicationError::InvalidInput(violations));
        }

        if self.participants.find_by_name(from).await?.is_none() {
            return Err(ApplicationError::Unauthorized(format!(
                "发送者不是在场参与者: {from}"
            )));
        }

        // 校验已限定 type，这里只兜底拒绝 status
        let message_type = match MessageType::parse(&request.message_type) {
            Some(t @ (MessageType::Message | MessageType::PrivateMessage)) => t,
            _ => {
                return Err(ApplicationError::InvalidInput(vec![Violation::new(
                    "type",
                    "type 必须是 message 或 private_message",
                )]));
            }
        };

        let message = Message::new(from, request.to, request.text, message_type, self.clock.now());
        let stored = self.messages.insert(message).await?;
        info!(id = %stored.id, from = %stored.from, message_type = %stored.message_type, "消息已写入");
        Ok(stored)
    }

    /// 系统进出通知
    ///
    /// 不做发送者授权（被通知的参与者正在进入或刚被驱逐），
    /// 目的地固定为广播保留值，类型固定为 `status`。
    pub async fn append_system(
        &self,
        from: &str,
        text: impl Into<String>,
    ) -> ApplicationResult<Message> {
        let message = Message::status(from, &self.broadcast_token, text.into(), self.clock.now());
        Ok(self.messages.insert(message).await?)
    }

    /// 按受众过滤的时序查询
    ///
    /// 只保留 `from == user`、`to == user` 或 `to == 广播` 的消息。
    /// 正的 `limit` 截取尾部（最近的 `limit` 条，保持时序）；
    /// `None` 或 0 返回完整过滤序列。
    pub async fn query(&self, user: &str, limit: Option<usize>) -> ApplicationResult<Vec<Message>> {
        let mut visible: Vec<Message> = self
            .messages
            .list_all()
            .await?
            .into_iter()
            .filter(|message| message.visible_to(user, &self.broadcast_token))
            .collect();

        if let Some(limit) = limit {
            if limit > 0 && visible.len() > limit {
                visible.drain(..visible.len() - limit);
            }
        }
        Ok(visible)
    }

    /// 删除消息：只有原发送者可以删除
    pub async fn delete(&self, id: Uuid, user: &str) -> ApplicationResult<()> {
        let existing = self
            .messages
            .list_all()
            .await?
            .into_iter()
            .find(|message| message.id == id);

        let Some(message) = existing else {
            return Err(ApplicationError::NotFound(format!("消息不存在: {id}")));
        };
        if message.from != user {
            return Err(ApplicationError::Forbidden(
                "只能删除自己的消息".to_string(),
            ));
        }

        if !self.messages.delete_by_id(id).await? {
            // 读取与删除之间已被并发移除
            return Err(ApplicationError::NotFound(format!("消息不存在: {id}")));
        }
        info!(id = %id, user = %user, "消息已删除");
        Ok(())
    }
}
