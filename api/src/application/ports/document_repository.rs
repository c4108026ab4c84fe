use async_trait::async_trait;

use crate::application::access::DocumentScope;
use crate::application::dto::pagination::Page;
use crate::domain::documents::document::{Document, Permission};

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub permission: Permission,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub permission: Option<Permission>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, doc: &NewDocument) -> anyhow::Result<Document>;

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Document>>;

    // Newest first; the count ignores paging.
    async fn list(&self, scope: DocumentScope, page: Page)
    -> anyhow::Result<(Vec<Document>, i64)>;

    async fn list_by_owner(
        &self,
        owner_id: i64,
        scope: DocumentScope,
        page: Page,
    ) -> anyhow::Result<(Vec<Document>, i64)>;

    async fn search_by_title(
        &self,
        scope: DocumentScope,
        term: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<Document>>;

    async fn update(&self, id: i64, changes: &DocumentChanges)
    -> anyhow::Result<Option<Document>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
