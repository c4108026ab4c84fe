use crate::application::access::{self, Requester};
use crate::application::dto::documents::DocumentView;
use crate::application::error::AppResult;
use crate::application::ports::document_repository::DocumentRepository;

pub struct SearchDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> SearchDocuments<'a, R> {
    pub async fn execute(
        &self,
        requester: &Requester,
        term: &str,
        limit: i64,
    ) -> AppResult<Vec<DocumentView>> {
        let scope = access::listing_scope(requester);
        let hits = self
            .repo
            .search_by_title(scope, term.trim(), limit)
            .await?;
        Ok(hits
            .into_iter()
            .map(|d| DocumentView::for_requester(requester, d))
            .collect())
    }
}
