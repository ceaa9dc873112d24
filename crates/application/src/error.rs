//! 应用层错误定义
//!
//! 每个变体对应一个稳定错误码，边界层据此映射状态码，
//! 不需要重新推导业务规则。错误只作为返回值透出，
//! 内部从不拿错误做正常控制流。

use crate::validation::Violation;
use domain::RepositoryError;
use thiserror::Error;

/// 应用层错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// 负载未通过形状校验，携带收集到的全部违规
    #[error("invalid input: {0:?}")]
    InvalidInput(Vec<Violation>),

    /// 重复的参与者名字
    #[error("conflict: {0}")]
    Conflict(String),

    /// 引用的参与者或消息不存在
    #[error("not found: {0}")]
    NotFound(String),

    /// 发送者不是在场参与者
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 非发送者尝试删除消息
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 底层持久化故障，核心不可恢复，向调用方透出
    #[error("storage error: {0}")]
    Storage(String),
}

/// 应用层结果类型
pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// 稳定错误码，与错误分类一一对应
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateKey => Self::Conflict("duplicate key".to_string()),
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            RepositoryError::Storage(message) => Self::Storage(message),
        }
    }
}
