use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::dto::pagination::Page;
use crate::application::ports::user_repository::{
    NewUser, UserChanges, UserRepository, UserWriteError,
};
use crate::domain::users::role::Role;
use crate::domain::users::user::{User, UserCredentials};
use crate::infrastructure::db::{PgPool, like_pattern};

const USER_COLUMNS: &str = "id, username, full_name, email, role_id, created_at, updated_at";

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(r: &PgRow) -> anyhow::Result<User> {
    let role_id: i16 = r.get("role_id");
    let role =
        Role::from_id(role_id).ok_or_else(|| anyhow::anyhow!("unknown role id {role_id}"))?;
    Ok(User {
        id: r.get("id"),
        username: r.get("username"),
        full_name: r.get("full_name"),
        email: r.get("email"),
        role,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

fn map_write_error(err: sqlx::Error) -> UserWriteError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("users_email_key") => return UserWriteError::DuplicateEmail,
                Some("users_username_key") => return UserWriteError::DuplicateUsername,
                _ => {}
            }
        }
    }
    UserWriteError::Other(err.into())
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, UserWriteError> {
        let sql = format!(
            "INSERT INTO users (username, full_name, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.id())
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(map_user(&row)?)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        let sql = format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users
             WHERE email = LOWER($1) OR username = $1
             LIMIT 1"
        );
        let row = sqlx::query(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(r) => Ok(Some(UserCredentials {
                user: map_user(&r)?,
                password_hash: r.get("password_hash"),
            })),
            None => Ok(None),
        }
    }

    async fn list(&self, page: Page) -> anyhow::Result<(Vec<User>, i64)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        let items = rows.iter().map(map_user).collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn search_by_full_name(&self, term: &str, limit: i64) -> anyhow::Result<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE full_name ILIKE $1 ESCAPE '\\'
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_user).collect()
    }

    async fn update_user(
        &self,
        id: i64,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserWriteError> {
        let sql = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                email = COALESCE($4, email),
                password_hash = COALESCE($5, password_hash),
                role_id = COALESCE($6, role_id),
                updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(changes.username.as_deref())
            .bind(changes.full_name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.password_hash.as_deref())
            .bind(changes.role.map(Role::id))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(row.as_ref().map(map_user).transpose()?)
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
