//! PostgreSQL 连接与表结构初始化
//!
//! 连接句柄不做全局状态：入口处建好连接池后显式注入各服务，
//! `init`（这里）与 `shutdown`（`pool.close`）由进程入口负责。

pub mod repositories;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub type DbPool = PgPool;

/// 建立连接池；连接失败快速失败
pub async fn create_pg_pool(url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// 初始化表结构（幂等）
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            name TEXT PRIMARY KEY,
            last_heartbeat TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // seq 只用于保持创建时序，展示与排序语义由 sent_at 承载
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            seq BIGSERIAL PRIMARY KEY,
            id UUID NOT NULL UNIQUE,
            sender TEXT NOT NULL,
            recipient TEXT NOT NULL,
            text TEXT NOT NULL,
            message_type TEXT NOT NULL,
            sent_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
