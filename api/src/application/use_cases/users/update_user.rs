use crate::application::access::Requester;
use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::{UserChanges, UserRepository};
use crate::application::services::{passwords, validation};
use crate::domain::users::role::Role;
use crate::domain::users::user::User;

pub struct UpdateUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i16>,
}

impl<'a, R: UserRepository + ?Sized> UpdateUser<'a, R> {
    pub async fn execute(
        &self,
        actor: &Requester,
        id: i64,
        req: &UpdateUserRequest,
    ) -> AppResult<User> {
        if actor.id != id && !actor.is_admin() {
            return Err(AppError::forbidden("you can only update your own account"));
        }
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{id} does not meet any record")))?;

        let mut changes = UserChanges::default();
        if let Some(role_id) = req.role_id {
            let role = Role::from_id(role_id)
                .ok_or_else(|| AppError::validation(format!("unknown role id {role_id}")))?;
            if role != existing.role {
                if !actor.is_admin() {
                    return Err(AppError::forbidden("only admins can change roles"));
                }
                changes.role = Some(role);
            }
        }
        if let Some(username) = &req.username {
            changes.username = Some(validation::username(username)?);
        }
        if let Some(full_name) = &req.full_name {
            changes.full_name = Some(validation::full_name(full_name)?);
        }
        if let Some(email) = &req.email {
            changes.email = Some(validation::normalize_email(email)?);
        }
        if let Some(password) = &req.password {
            validation::password(password)?;
            changes.password_hash = Some(passwords::hash_password(password)?);
        }
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .repo
            .update_user(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{id} does not meet any record")))?;
        tracing::info!(user_id = id, actor_id = actor.id, "user_updated");
        Ok(updated)
    }
}
