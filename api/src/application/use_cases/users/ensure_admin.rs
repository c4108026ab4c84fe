use crate::application::error::AppResult;
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::services::{passwords, validation};
use crate::domain::users::role::Role;
use crate::domain::users::user::User;

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Creates the configured admin account unless its email is already registered.
pub struct EnsureAdmin<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> EnsureAdmin<'a, R> {
    pub async fn execute(&self, seed: &AdminSeed) -> AppResult<Option<User>> {
        let email = validation::normalize_email(&seed.email)?;
        if self.repo.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }
        validation::password(&seed.password)?;
        let user = self
            .repo
            .create_user(&NewUser {
                username: validation::username(&seed.username)?,
                full_name: validation::full_name(&seed.full_name)?,
                email,
                password_hash: passwords::hash_password(&seed.password)?,
                role: Role::Admin,
            })
            .await?;
        tracing::info!(user_id = user.id, "admin_account_created");
        Ok(Some(user))
    }
}
