use crate::application::access::Requester;
use crate::application::error::{AppError, AppResult};
use crate::domain::users::user::User;

pub const SELF_DELETE_MESSAGE: &str = "You cant delete yourself";

/// Rejects deleting an account that shares both id and role with the actor.
pub fn guard_user_deletion(acting: &Requester, target: &User) -> AppResult<()> {
    if target.id == acting.id && target.role == acting.role {
        return Err(AppError::forbidden(SELF_DELETE_MESSAGE));
    }
    Ok(())
}
