//! 基础设施层
//!
//! 两个 Repository 接口的 PostgreSQL 实现、连接池生命周期，
//! 以及按配置装配核心服务的 builder。

pub mod builder;
pub mod db;

pub use builder::{build_services, BuildError, CoreServices};
pub use db::repositories::{PgMessageRepository, PgParticipantRepository};
pub use db::{create_pg_pool, ensure_schema, DbPool};
