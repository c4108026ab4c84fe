use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct GetUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetUser<'a, R> {
    /// `identifier` is a numeric id, an email, or a username.
    pub async fn execute(&self, identifier: &str) -> AppResult<User> {
        let identifier = identifier.trim();
        let found = if let Ok(id) = identifier.parse::<i64>() {
            self.repo.find_by_id(id).await?
        } else if identifier.contains('@') {
            self.repo.find_by_email(&identifier.to_lowercase()).await?
        } else {
            self.repo.find_by_username(identifier).await?
        };
        found.ok_or_else(|| AppError::not_found(format!("User with {identifier} does not exist")))
    }
}
