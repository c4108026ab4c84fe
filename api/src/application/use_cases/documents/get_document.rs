use crate::application::access::{self, Requester};
use crate::application::dto::documents::DocumentView;
use crate::application::error::{AppError, AppResult};
use crate::application::ports::document_repository::DocumentRepository;

pub struct GetDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> GetDocument<'a, R> {
    pub async fn execute(&self, requester: &Requester, id: i64) -> AppResult<DocumentView> {
        let doc = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("document {id} not found")))?;
        let access = access::require_view(requester, &doc)?;
        Ok(DocumentView {
            document: doc,
            access,
        })
    }
}
