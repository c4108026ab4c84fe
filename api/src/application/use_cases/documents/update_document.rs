use crate::application::access::{self, Requester};
use crate::application::dto::documents::DocumentView;
use crate::application::error::{AppError, AppResult};
use crate::application::ports::document_repository::{DocumentChanges, DocumentRepository};
use crate::application::services::validation;
use crate::domain::documents::document::Permission;

pub struct UpdateDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub permission: Option<Permission>,
}

impl<'a, R: DocumentRepository + ?Sized> UpdateDocument<'a, R> {
    pub async fn execute(
        &self,
        requester: &Requester,
        id: i64,
        req: &UpdateDocumentRequest,
    ) -> AppResult<DocumentView> {
        let doc = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("document {id} not found")))?;
        access::require_edit(requester, &doc)?;

        let changes = DocumentChanges {
            title: req
                .title
                .as_deref()
                .map(validation::document_title)
                .transpose()?,
            content: req.content.clone(),
            permission: req.permission,
        };
        let updated = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(format!("document {id} not found")))?;
        tracing::info!(document_id = id, actor_id = requester.id, "document_updated");
        Ok(DocumentView::for_requester(requester, updated))
    }
}
