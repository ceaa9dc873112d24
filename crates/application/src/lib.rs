//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：入站负载校验、参与者生命周期
//! （注册/心跳/驱逐）、受众感知的消息路由，以及供测试与无数据库
//! 部署使用的内存存储引擎。HTTP 传输层在本仓库范围之外，通过各服务
//! 返回的带稳定错误码的结果对接。

pub mod clock;
pub mod error;
pub mod memory;
pub mod services;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ApplicationError, ApplicationResult};
pub use memory::{InMemoryMessageRepository, InMemoryParticipantRepository};
pub use services::{
    MessageStore, ParticipantRegistry, PresenceReaper, ReaperConfig, SweepReport,
};
pub use validation::{JoinRequest, SendMessageRequest, Violation};
