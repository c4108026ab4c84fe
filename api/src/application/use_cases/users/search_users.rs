use crate::application::error::AppResult;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct SearchUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> SearchUsers<'a, R> {
    pub async fn execute(&self, term: &str, limit: i64) -> AppResult<Vec<User>> {
        Ok(self.repo.search_by_full_name(term.trim(), limit).await?)
    }
}
