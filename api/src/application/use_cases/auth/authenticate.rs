use uuid::Uuid;

use crate::application::error::{AppError, AppResult};
use crate::application::ports::token_revocation_repository::TokenRevocationRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

/// Resolves the user behind an already verified token. Revoked tokens and
/// deleted accounts are rejected; the role comes from storage, not the token.
pub struct Authenticate<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TokenRevocationRepository + ?Sized,
{
    pub users: &'a U,
    pub revocations: &'a T,
}

impl<'a, U, T> Authenticate<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TokenRevocationRepository + ?Sized,
{
    pub async fn execute(&self, user_id: i64, jti: Uuid) -> AppResult<User> {
        if self.revocations.is_revoked(jti).await? {
            return Err(AppError::Unauthorized("token has been revoked".into()));
        }
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("account no longer exists".into()))
    }
}
