use async_trait::async_trait;
use sqlx::Row;

use crate::application::ports::role_repository::{RoleRepository, RoleRow};
use crate::infrastructure::db::PgPool;

pub struct SqlxRoleRepository {
    pub pool: PgPool,
}

impl SqlxRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for SqlxRoleRepository {
    async fn list_roles(&self) -> anyhow::Result<Vec<RoleRow>> {
        let rows = sqlx::query("SELECT id, title FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| RoleRow {
                id: r.get("id"),
                title: r.get("title"),
            })
            .collect())
    }
}
