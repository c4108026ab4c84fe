use async_trait::async_trait;

use crate::application::dto::pagination::Page;
use crate::application::error::AppError;
use crate::domain::users::role::Role;
use crate::domain::users::user::{User, UserCredentials};

pub const EMAIL_TAKEN_MESSAGE: &str =
    "This email is in existence please choose a new one or login";
pub const USERNAME_TAKEN_MESSAGE: &str = "This username is already taken";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.full_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UserWriteError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UserWriteError> for AppError {
    fn from(err: UserWriteError) -> Self {
        match err {
            UserWriteError::DuplicateEmail => AppError::Conflict(EMAIL_TAKEN_MESSAGE.into()),
            UserWriteError::DuplicateUsername => {
                AppError::Conflict(USERNAME_TAKEN_MESSAGE.into())
            }
            UserWriteError::Other(e) => AppError::Internal(e),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, UserWriteError>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    // Matches either the email or the username.
    async fn find_credentials(&self, identifier: &str)
    -> anyhow::Result<Option<UserCredentials>>;
    async fn list(&self, page: Page) -> anyhow::Result<(Vec<User>, i64)>;
    /// Case-insensitive substring match, newest first, at most `limit` rows.
    async fn search_by_full_name(&self, term: &str, limit: i64) -> anyhow::Result<Vec<User>>;
    async fn update_user(
        &self,
        id: i64,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserWriteError>;
    async fn delete_user(&self, id: i64) -> anyhow::Result<bool>;
}
