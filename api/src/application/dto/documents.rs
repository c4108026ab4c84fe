use crate::application::access::{self, DocumentAccess, DocumentRef, Requester};
use crate::domain::documents::document::Document;

/// A document paired with what the requester may do with it.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub document: Document,
    pub access: DocumentAccess,
}

impl DocumentView {
    pub fn for_requester(requester: &Requester, document: Document) -> Self {
        let access = access::evaluate(requester, &DocumentRef::from(&document));
        Self { document, access }
    }
}
