//! 消息实体定义
//!
//! 消息创建后不可变，唯一的例外是删除，并且只有原发送者可以删除。

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 消息类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// 公开消息
    Message,
    /// 私聊消息
    PrivateMessage,
    /// 系统进出通知（入场/离场），由系统代表参与者生成
    Status,
}

impl MessageType {
    /// 解析线上格式的类型字符串
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "message" => Some(Self::Message),
            "private_message" => Some(Self::PrivateMessage),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::PrivateMessage => "private_message",
            Self::Status => "status",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 消息实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 创建时分配的唯一ID，之后不可变
    pub id: Uuid,
    /// 发送者名字
    pub from: String,
    /// 目的地：具体参与者名字，或广播保留值
    pub to: String,
    /// 消息内容
    pub text: String,
    /// 消息类型
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// 创建时间戳，查询按它保持时序
    pub sent_at: Timestamp,
}

impl Message {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        message_type: MessageType,
        now: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
            message_type,
            sent_at: now,
        }
    }

    /// 系统进出通知：目的地固定为广播保留值
    pub fn status(
        from: impl Into<String>,
        broadcast_token: impl Into<String>,
        text: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self::new(from, broadcast_token, text, MessageType::Status, now)
    }

    /// `user` 是否属于该消息的受众
    ///
    /// 受众规则：自己发出的、发给自己的、以及广播消息。
    pub fn visible_to(&self, user: &str, broadcast_token: &str) -> bool {
        self.from == user || self.to == user || self.to == broadcast_token
    }

    /// 展示用的创建时间（HH:MM:SS）
    pub fn display_time(&self) -> String {
        self.sent_at.format("%H:%M:%S").to_string()
    }
}
