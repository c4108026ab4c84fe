use crate::application::access::Requester;
use crate::application::access::accounts::guard_user_deletion;
use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::User;

pub struct DeleteUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteUser<'a, R> {
    pub async fn execute(&self, actor: &Requester, id: i64) -> AppResult<User> {
        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {id} not found")))?;
        guard_user_deletion(actor, &target)?;
        if !actor.is_admin() {
            return Err(AppError::forbidden("only admins can delete users"));
        }
        if !self.repo.delete_user(id).await? {
            return Err(AppError::not_found(format!("user {id} not found")));
        }
        tracing::info!(user_id = id, actor_id = actor.id, "user_deleted");
        Ok(target)
    }
}
