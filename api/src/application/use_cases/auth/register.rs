use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::{EMAIL_TAKEN_MESSAGE, NewUser, UserRepository};
use crate::application::services::{passwords, validation};
use crate::domain::users::role::Role;
use crate::domain::users::user::User;

pub const ADMIN_SIGNUP_MESSAGE: &str = "You can't create an admin account yourself";

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role_id: Option<i16>,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> AppResult<User> {
        // Signup always produces a regular account.
        if req.role_id == Some(Role::Admin.id()) {
            return Err(AppError::forbidden(ADMIN_SIGNUP_MESSAGE));
        }
        let username = validation::username(&req.username)?;
        let full_name = validation::full_name(&req.full_name)?;
        let email = validation::normalize_email(&req.email)?;
        validation::password(&req.password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN_MESSAGE.into()));
        }
        let password_hash = passwords::hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(&NewUser {
                username,
                full_name,
                email,
                password_hash,
                role: Role::Regular,
            })
            .await?;
        tracing::info!(user_id = user.id, "user_registered");
        Ok(user)
    }
}
