use chrono::{DateTime, Utc};

use crate::application::ports::token_revocation_repository::TokenRevocationRepository;

pub struct PurgeRevokedTokens<'a, T: TokenRevocationRepository + ?Sized> {
    pub revocations: &'a T,
}

impl<'a, T: TokenRevocationRepository + ?Sized> PurgeRevokedTokens<'a, T> {
    pub async fn execute(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let removed = self.revocations.purge_expired(now).await?;
        if removed > 0 {
            tracing::debug!(removed, "revoked_tokens_purged");
        }
        Ok(removed)
    }
}
