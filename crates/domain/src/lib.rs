//! 聊天房间核心领域模型
//!
//! 包含参与者、消息两个实体，以及抽象存储协作方的 Repository 接口。

pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::*;
pub use errors::*;
pub use repositories::*;

/// 全系统统一的时间戳类型
pub type Timestamp = chrono::DateTime<chrono::Utc>;
