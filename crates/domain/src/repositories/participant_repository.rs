//! 参与者集合的抽象存储接口

use crate::{Participant, RepositoryError, Timestamp};
use async_trait::async_trait;

/// 参与者 Repository
///
/// 注册表是参与者状态的唯一写入方，所有变更都经由这里落到存储。
/// 实现方负责让写路径满足下述原子契约；调用方不假设存储单线程。
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError>;

    /// 插入新参与者；同名记录已存在时返回 `DuplicateKey`。
    /// 查重与插入必须是一个原子步骤。
    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError>;

    /// 刷新心跳；记录不存在时返回 `NotFound`
    async fn update_heartbeat(&self, name: &str, at: Timestamp) -> Result<(), RepositoryError>;

    /// 原子的比较并删除：仅当存储中的 `last_heartbeat < stale_before` 时移除。
    /// 返回是否真正删除。与并发心跳竞争时心跳必须获胜：
    /// 心跳已把时间戳刷过界限的参与者不允许被这里删掉。
    async fn delete_if_stale(
        &self,
        name: &str,
        stale_before: Timestamp,
    ) -> Result<bool, RepositoryError>;

    /// 当前全部参与者；顺序不承载语义（插入序即可）
    async fn list_all(&self) -> Result<Vec<Participant>, RepositoryError>;
}
