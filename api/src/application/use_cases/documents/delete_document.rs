use crate::application::access::{self, Requester};
use crate::application::error::{AppError, AppResult};
use crate::application::ports::document_repository::DocumentRepository;

pub struct DeleteDocument<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> DeleteDocument<'a, R> {
    pub async fn execute(&self, requester: &Requester, id: i64) -> AppResult<()> {
        let doc = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("document {id} not found")))?;
        access::require_delete(requester, &doc)?;
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found(format!("document {id} not found")));
        }
        tracing::info!(document_id = id, actor_id = requester.id, "document_deleted");
        Ok(())
    }
}
