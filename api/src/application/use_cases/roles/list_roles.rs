use crate::application::error::AppResult;
use crate::application::ports::role_repository::{RoleRepository, RoleRow};

pub struct ListRoles<'a, R: RoleRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RoleRepository + ?Sized> ListRoles<'a, R> {
    pub async fn execute(&self) -> AppResult<Vec<RoleRow>> {
        Ok(self.repo.list_roles().await?)
    }
}
