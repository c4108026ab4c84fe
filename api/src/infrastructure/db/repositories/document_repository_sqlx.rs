use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::access::DocumentScope;
use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::{
    DocumentChanges, DocumentRepository, NewDocument,
};
use crate::domain::documents::document::{Document, Permission};
use crate::infrastructure::db::{PgPool, like_pattern};

const DOCUMENT_COLUMNS: &str = "id, owner_id, title, content, permission, created_at, updated_at";

// `$1` is the viewer id, NULL meaning unrestricted.
const SCOPE_FILTER: &str = "($1::BIGINT IS NULL OR owner_id = $1 OR permission = 'public')";

pub struct SqlxDocumentRepository {
    pub pool: PgPool,
}

impl SqlxDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn viewer_param(scope: DocumentScope) -> Option<i64> {
    match scope {
        DocumentScope::All => None,
        DocumentScope::VisibleTo(uid) => Some(uid),
    }
}

fn map_document(r: &PgRow) -> anyhow::Result<Document> {
    let permission: String = r.get("permission");
    Ok(Document {
        id: r.get("id"),
        owner_id: r.get("owner_id"),
        title: r.get("title"),
        content: r.get("content"),
        permission: permission.parse::<Permission>()?,
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl DocumentRepository for SqlxDocumentRepository {
    async fn create(&self, doc: &NewDocument) -> anyhow::Result<Document> {
        let sql = format!(
            "INSERT INTO documents (owner_id, title, content, permission)
             VALUES ($1, $2, $3, $4)
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(doc.owner_id)
            .bind(&doc.title)
            .bind(&doc.content)
            .bind(doc.permission.as_str())
            .fetch_one(&self.pool)
            .await?;
        map_document(&row)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Document>> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_document).transpose()
    }

    async fn list(
        &self,
        scope: DocumentScope,
        page: Page,
    ) -> anyhow::Result<(Vec<Document>, i64)> {
        let viewer = viewer_param(scope);
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(1) FROM documents WHERE {SCOPE_FILTER}"
        ))
        .bind(viewer)
        .fetch_one(&self.pool)
        .await?;
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE {SCOPE_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&sql)
            .bind(viewer)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        let items = rows
            .iter()
            .map(map_document)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        scope: DocumentScope,
        page: Page,
    ) -> anyhow::Result<(Vec<Document>, i64)> {
        let viewer = viewer_param(scope);
        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(1) FROM documents WHERE owner_id = $2 AND {SCOPE_FILTER}"
        ))
        .bind(viewer)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE owner_id = $2 AND {SCOPE_FILTER}
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query(&sql)
            .bind(viewer)
            .bind(owner_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        let items = rows
            .iter()
            .map(map_document)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn search_by_title(
        &self,
        scope: DocumentScope,
        term: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<Document>> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents
             WHERE {SCOPE_FILTER} AND title ILIKE $2 ESCAPE '\\'
             ORDER BY CASE WHEN LOWER(title) = LOWER($3) THEN 0 ELSE 1 END, updated_at DESC
             LIMIT $4"
        );
        let rows = sqlx::query(&sql)
            .bind(viewer_param(scope))
            .bind(like_pattern(term))
            .bind(term)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_document).collect()
    }

    async fn update(
        &self,
        id: i64,
        changes: &DocumentChanges,
    ) -> anyhow::Result<Option<Document>> {
        let sql = format!(
            "UPDATE documents SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                permission = COALESCE($4, permission),
                updated_at = now()
             WHERE id = $1
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.content.as_deref())
            .bind(changes.permission.map(Permission::as_str))
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_document).transpose()
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
