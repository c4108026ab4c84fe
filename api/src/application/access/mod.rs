//! Document access policy.
//!
//! Ownership grants every action on a document, the admin role grants every
//! action regardless of ownership, and everyone else may only view documents
//! marked public. The same rule drives both single-document checks and the
//! scope used to filter listings.

use crate::application::error::{AppError, AppResult};
use crate::domain::documents::document::{Document, Permission};
use crate::domain::users::role::Role;

pub mod accounts;

/// An authenticated caller. The presentation layer builds this from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: i64,
    pub role: Role,
}

impl Requester {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The part of a document the policy looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentRef {
    pub owner_id: i64,
    pub permission: Permission,
}

impl From<&Document> for DocumentRef {
    fn from(doc: &Document) -> Self {
        Self {
            owner_id: doc.owner_id,
            permission: doc.permission,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentAccess {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

pub fn evaluate(requester: &Requester, doc: &DocumentRef) -> DocumentAccess {
    let owns = requester.id == doc.owner_id;
    let manages = owns || requester.is_admin();
    DocumentAccess {
        can_view: manages || doc.permission == Permission::Public,
        can_edit: manages,
        can_delete: manages,
    }
}

/// Which documents a requester may see in listings and searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentScope {
    All,
    /// Documents owned by the user plus every public document.
    VisibleTo(i64),
}

impl DocumentScope {
    pub fn admits(&self, doc: &DocumentRef) -> bool {
        match self {
            DocumentScope::All => true,
            DocumentScope::VisibleTo(uid) => {
                doc.owner_id == *uid || doc.permission == Permission::Public
            }
        }
    }
}

pub fn listing_scope(requester: &Requester) -> DocumentScope {
    if requester.is_admin() {
        DocumentScope::All
    } else {
        DocumentScope::VisibleTo(requester.id)
    }
}

// Hidden documents are reported as missing so their existence does not leak.
pub fn require_view(requester: &Requester, doc: &Document) -> AppResult<DocumentAccess> {
    let access = evaluate(requester, &DocumentRef::from(doc));
    if access.can_view {
        Ok(access)
    } else {
        Err(AppError::not_found(format!("document {} not found", doc.id)))
    }
}

pub fn require_edit(requester: &Requester, doc: &Document) -> AppResult<DocumentAccess> {
    let access = require_view(requester, doc)?;
    if access.can_edit {
        Ok(access)
    } else {
        Err(AppError::forbidden(
            "only the owner or an admin can edit this document",
        ))
    }
}

pub fn require_delete(requester: &Requester, doc: &Document) -> AppResult<DocumentAccess> {
    let access = require_view(requester, doc)?;
    if access.can_delete {
        Ok(access)
    } else {
        Err(AppError::forbidden(
            "only the owner or an admin can delete this document",
        ))
    }
}
