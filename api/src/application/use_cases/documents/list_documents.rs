use crate::application::access::{self, Requester};
use crate::application::dto::documents::DocumentView;
use crate::application::dto::pagination::{Page, Paged};
use crate::application::error::AppResult;
use crate::application::ports::document_repository::DocumentRepository;

pub struct ListDocuments<'a, R: DocumentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: DocumentRepository + ?Sized> ListDocuments<'a, R> {
    pub async fn execute(&self, requester: &Requester, page: Page) -> AppResult<Paged<DocumentView>> {
        let scope = access::listing_scope(requester);
        let (docs, total) = self.repo.list(scope, page).await?;
        let items = docs
            .into_iter()
            .map(|d| DocumentView::for_requester(requester, d))
            .collect();
        Ok(Paged { items, total, page })
    }
}
