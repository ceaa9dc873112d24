//! 入站负载校验
//!
//! 纯函数：输入到违规列表的映射，不触发任何状态。
//! 每种请求是独立的类型并带自己的校验函数；校验收集全部违规
//! 而不是在首个违规处停止。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 单条校验违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

impl Violation {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 进入房间请求
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

impl JoinRequest {
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(Violation::new("name", "name 不能为空"));
        }
        violations
    }
}

/// 发送消息请求
///
/// `type` 只接受 `message` / `private_message`；
/// `status` 由系统生成，不经过这里。
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub message_type: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.to.trim().is_empty() {
            violations.push(Violation::new("to", "to 不能为空"));
        }
        if self.text.trim().is_empty() {
            violations.push(Violation::new("text", "text 不能为空"));
        }
        if self.message_type != "message" && self.message_type != "private_message" {
            violations.push(Violation::new(
                "type",
                "type 必须是 message 或 private_message",
            ));
        }
        violations
    }
}
