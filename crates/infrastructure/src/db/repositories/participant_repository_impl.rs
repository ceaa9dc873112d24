//! 参与者 Repository 的 PostgreSQL 实现

use async_trait::async_trait;
use domain::{Participant, ParticipantRepository, RepositoryError, Timestamp};
use sqlx::FromRow;

use super::storage_error;
use crate::db::DbPool;

#[derive(Debug, Clone, FromRow)]
struct DbParticipant {
    name: String,
    last_heartbeat: Timestamp,
}

impl From<DbParticipant> for Participant {
    fn from(row: DbParticipant) -> Self {
        Participant {
            name: row.name,
            last_heartbeat: row.last_heartbeat,
        }
    }
}

pub struct PgParticipantRepository {
    pool: DbPool,
}

impl PgParticipantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        let row = sqlx::query_as::<_, DbParticipant>(
            "SELECT name, last_heartbeat FROM participants WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(row.map(Participant::from))
    }

    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError> {
        // 查重与插入交给唯一约束，一条语句内原子完成
        let result = sqlx::query(
            "INSERT INTO participants (name, last_heartbeat) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(&participant.name)
        .bind(participant.last_heartbeat)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::DuplicateKey);
        }
        Ok(())
    }

    async fn update_heartbeat(&self, name: &str, at: Timestamp) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE participants SET last_heartbeat = $2 WHERE name = $1")
            .bind(name)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_if_stale(
        &self,
        name: &str,
        stale_before: Timestamp,
    ) -> Result<bool, RepositoryError> {
        // 行级条件删除：与并发的心跳 UPDATE 串行化，心跳获胜
        let result =
            sqlx::query("DELETE FROM participants WHERE name = $1 AND last_heartbeat < $2")
                .bind(name)
                .bind(stale_before)
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<Participant>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbParticipant>(
            "SELECT name, last_heartbeat FROM participants ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(rows.into_iter().map(Participant::from).collect())
    }
}
