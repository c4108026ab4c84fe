use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::error::AppResult;
use crate::application::ports::token_revocation_repository::TokenRevocationRepository;

pub struct Logout<'a, T: TokenRevocationRepository + ?Sized> {
    pub revocations: &'a T,
}

impl<'a, T: TokenRevocationRepository + ?Sized> Logout<'a, T> {
    pub async fn execute(&self, jti: Uuid, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.revocations.revoke(jti, expires_at).await?;
        Ok(())
    }
}
