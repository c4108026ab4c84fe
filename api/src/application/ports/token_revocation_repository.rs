use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Denylist of token ids that were logged out before they expired.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRevocationRepository: Send + Sync {
    async fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<()>;
    async fn is_revoked(&self, jti: Uuid) -> anyhow::Result<bool>;
    // Returns the number of rows removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}
