use crate::application::access::Requester;
use crate::application::dto::documents::DocumentView;
use crate::application::error::AppResult;
use crate::application::ports::document_repository::{DocumentRepository, NewDocument};
use crate::application::services::validation;
use crate::domain::documents::document::Permission;

pub struct CreateDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: Option<String>,
    pub permission: Option<Permission>,
}

impl<'a, R: DocumentRepository + ?Sized> CreateDocument<'a, R> {
    pub async fn execute(
        &self,
        requester: &Requester,
        req: &CreateDocumentRequest,
    ) -> AppResult<DocumentView> {
        let title = validation::document_title(&req.title)?;
        let doc = self
            .repo
            .create(&NewDocument {
                owner_id: requester.id,
                title,
                content: req.content.clone().unwrap_or_default(),
                permission: req.permission.unwrap_or(Permission::Private),
            })
            .await?;
        tracing::info!(document_id = doc.id, owner_id = doc.owner_id, "document_created");
        Ok(DocumentView::for_requester(requester, doc))
    }
}
