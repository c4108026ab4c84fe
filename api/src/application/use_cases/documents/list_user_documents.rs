use crate::application::access::{self, Requester};
use crate::application::dto::documents::DocumentView;
use crate::application::dto::pagination::{Page, Paged};
use crate::application::error::{AppError, AppResult};
use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::user_repository::UserRepository;

/// Documents owned by one user, narrowed to what the requester may see.
pub struct ListUserDocuments<'a, U, D>
where
    U: UserRepository + ?Sized,
    D: DocumentRepository + ?Sized,
{
    pub users: &'a U,
    pub documents: &'a D,
}

impl<'a, U, D> ListUserDocuments<'a, U, D>
where
    U: UserRepository + ?Sized,
    D: DocumentRepository + ?Sized,
{
    pub async fn execute(
        &self,
        requester: &Requester,
        owner_id: i64,
        page: Page,
    ) -> AppResult<Paged<DocumentView>> {
        if self.users.find_by_id(owner_id).await?.is_none() {
            return Err(AppError::not_found(format!("user {owner_id} not found")));
        }
        let scope = access::listing_scope(requester);
        let (docs, total) = self.documents.list_by_owner(owner_id, scope, page).await?;
        let items = docs
            .into_iter()
            .map(|d| DocumentView::for_requester(requester, d))
            .collect();
        Ok(Paged { items, total, page })
    }
}
