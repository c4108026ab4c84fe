use crate::application::dto::pagination::{Page, Paged};
use crate::application::error::AppResult;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct ListUsers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListUsers<'a, R> {
    pub async fn execute(&self, page: Page) -> AppResult<Paged<User>> {
        let (items, total) = self.repo.list(page).await?;
        Ok(Paged { items, total, page })
    }
}
