//! In-memory port implementations for router-level tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::access::{DocumentRef, DocumentScope};
use crate::application::dto::pagination::Page;
use crate::application::ports::document_repository::{
    DocumentChanges, DocumentRepository, NewDocument,
};
use crate::application::ports::role_repository::{RoleRepository, RoleRow};
use crate::application::ports::token_revocation_repository::TokenRevocationRepository;
use crate::application::ports::user_repository::{
    NewUser, UserChanges, UserRepository, UserWriteError,
};
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::documents::document::Document;
use crate::domain::users::role::Role;
use crate::domain::users::user::{User, UserCredentials};

pub const TEST_JWT_SECRET: &str = "router-tests-secret-0123456789";

fn paginate<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    rows.iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[derive(Default)]
pub struct InMemoryUsers {
    // (user, password hash), in insertion order
    rows: Mutex<Vec<(User, String)>>,
}

impl InMemoryUsers {
    fn conflict(
        rows: &[(User, String)],
        skip_id: Option<i64>,
        email: Option<&str>,
        username: Option<&str>,
    ) -> Option<UserWriteError> {
        let others = || rows.iter().filter(move |(u, _)| Some(u.id) != skip_id);
        if let Some(email) = email {
            if others().any(|(u, _)| u.email == email) {
                return Some(UserWriteError::DuplicateEmail);
            }
        }
        if let Some(username) = username {
            if others().any(|(u, _)| u.username == username) {
                return Some(UserWriteError::DuplicateUsername);
            }
        }
        None
    }

    fn newest_first(&self) -> Vec<User> {
        let rows = self.rows.lock().unwrap();
        rows.iter().rev().map(|(u, _)| u.clone()).collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, user: &NewUser) -> Result<User, UserWriteError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(err) = Self::conflict(&rows, None, Some(&user.email), Some(&user.username)) {
            return Err(err);
        }
        let now = Utc::now();
        let id = rows.iter().map(|(u, _)| u.id).max().unwrap_or(0) + 1;
        let created = User {
            id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        rows.push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> anyhow::Result<Option<UserCredentials>> {
        let lowered = identifier.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(u, _)| u.email == lowered || u.username == identifier)
            .map(|(u, hash)| UserCredentials {
                user: u.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list(&self, page: Page) -> anyhow::Result<(Vec<User>, i64)> {
        let all = self.newest_first();
        Ok((paginate(&all, page), all.len() as i64))
    }

    async fn search_by_full_name(&self, term: &str, limit: i64) -> anyhow::Result<Vec<User>> {
        let needle = term.to_lowercase();
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|u| u.full_name.to_lowercase().contains(&needle))
            .take(limit as usize)
            .collect())
    }

    async fn update_user(
        &self,
        id: i64,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserWriteError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(err) = Self::conflict(
            &rows,
            Some(id),
            changes.email.as_deref(),
            changes.username.as_deref(),
        ) {
            return Err(err);
        }
        let Some((user, hash)) = rows.iter_mut().find(|(u, _)| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.username {
            user.username = v.clone();
        }
        if let Some(v) = &changes.full_name {
            user.full_name = v.clone();
        }
        if let Some(v) = &changes.email {
            user.email = v.clone();
        }
        if let Some(v) = &changes.password_hash {
            *hash = v.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(u, _)| u.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryDocuments {
    rows: Mutex<Vec<Document>>,
}

impl InMemoryDocuments {
    fn visible(&self, scope: DocumentScope, owner: Option<i64>) -> Vec<Document> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .rev()
            .filter(|d| owner.is_none_or(|o| d.owner_id == o))
            .filter(|d| scope.admits(&DocumentRef::from(*d)))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocuments {
    async fn create(&self, doc: &NewDocument) -> anyhow::Result<Document> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        let created = Document {
            id: rows.iter().map(|d| d.id).max().unwrap_or(0) + 1,
            owner_id: doc.owner_id,
            title: doc.title.clone(),
            content: doc.content.clone(),
            permission: doc.permission,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Document>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|d| d.id == id).cloned())
    }

    async fn list(
        &self,
        scope: DocumentScope,
        page: Page,
    ) -> anyhow::Result<(Vec<Document>, i64)> {
        let all = self.visible(scope, None);
        Ok((paginate(&all, page), all.len() as i64))
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        scope: DocumentScope,
        page: Page,
    ) -> anyhow::Result<(Vec<Document>, i64)> {
        let all = self.visible(scope, Some(owner_id));
        Ok((paginate(&all, page), all.len() as i64))
    }

    async fn search_by_title(
        &self,
        scope: DocumentScope,
        term: &str,
        limit: i64,
    ) -> anyhow::Result<Vec<Document>> {
        let needle = term.to_lowercase();
        Ok(self
            .visible(scope, None)
            .into_iter()
            .filter(|d| d.title.to_lowercase().contains(&needle))
            .take(limit as usize)
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        changes: &DocumentChanges,
    ) -> anyhow::Result<Option<Document>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(doc) = rows.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &changes.title {
            doc.title = v.clone();
        }
        if let Some(v) = &changes.content {
            doc.content = v.clone();
        }
        if let Some(p) = changes.permission {
            doc.permission = p;
        }
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|d| d.id != id);
        Ok(rows.len() != before)
    }
}

pub struct StaticRoles;

#[async_trait]
impl RoleRepository for StaticRoles {
    async fn list_roles(&self) -> anyhow::Result<Vec<RoleRow>> {
        Ok([Role::Admin, Role::Regular]
            .into_iter()
            .map(|r| RoleRow {
                id: r.id(),
                title: r.title().to_string(),
            })
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryRevocations {
    rows: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

#[async_trait]
impl TokenRevocationRepository for InMemoryRevocations {
    async fn revoke(&self, jti: Uuid, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.rows.lock().unwrap().entry(jti).or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.lock().unwrap().contains_key(&jti))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, exp| *exp > now);
        Ok((before - rows.len()) as u64)
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
        _ => None,
    })
    .expect("test config")
}

pub struct TestApp {
    pub ctx: AppContext,
    pub revocations: Arc<InMemoryRevocations>,
}

pub fn test_app() -> TestApp {
    let revocations = Arc::new(InMemoryRevocations::default());
    let services = AppServices::new(
        Arc::new(InMemoryUsers::default()),
        Arc::new(InMemoryDocuments::default()),
        Arc::new(StaticRoles),
        revocations.clone(),
    );
    TestApp {
        ctx: AppContext::new(test_config(), services),
        revocations,
    }
}
