use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords;
use crate::domain::users::user::User;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials supplied!";

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Email or username.
    pub identifier: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> AppResult<User> {
        let identifier = req.identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into()));
        }
        let creds = match self.repo.find_credentials(identifier).await? {
            Some(c) => c,
            None => return Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into())),
        };
        if passwords::verify_password(&req.password, &creds.password_hash)? {
            Ok(creds.user)
        } else {
            tracing::debug!(user_id = creds.user.id, "login_password_mismatch");
            Err(AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.into()))
        }
    }
}
