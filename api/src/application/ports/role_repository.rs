use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    pub id: i16,
    pub title: String,
}

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list_roles(&self) -> anyhow::Result<Vec<RoleRow>>;
}
