//! 领域层错误定义

use thiserror::Error;

/// 抽象存储协作方的错误类型
///
/// 存储故障必须向调用方透出，不允许静默吞掉。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// 唯一键冲突（同名参与者已存在）
    #[error("duplicate key")]
    DuplicateKey,

    /// 记录不存在
    #[error("record not found")]
    NotFound,

    /// 底层持久化故障
    #[error("storage failure: {0}")]
    Storage(String),
}
