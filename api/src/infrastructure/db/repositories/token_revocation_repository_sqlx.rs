use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::ports::token_revocation_repository::TokenRevocationRepository;
use crate::infrastructure::db::PgPool;

pub struct SqlxTokenRevocationRepository {
    pub pool: PgPool,
}

impl SqlxTokenRevocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRevocationRepository for SqlxTokenRevocationRepository {
    async fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO revoked_tokens (jti, expires_at) VALUES ($1, $2)
               ON CONFLICT (jti) DO NOTHING"#,
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> anyhow::Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM revoked_tokens WHERE jti = $1")
            .bind(jti)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
