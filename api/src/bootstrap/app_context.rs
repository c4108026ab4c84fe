use std::sync::Arc;

use crate::application::ports::document_repository::DocumentRepository;
use crate::application::ports::role_repository::RoleRepository;
use crate::application::ports::token_revocation_repository::TokenRevocationRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

/// Router state: configuration plus injected service handles.
#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    document_repo: Arc<dyn DocumentRepository>,
    role_repo: Arc<dyn RoleRepository>,
    token_revocations: Arc<dyn TokenRevocationRepository>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        document_repo: Arc<dyn DocumentRepository>,
        role_repo: Arc<dyn RoleRepository>,
        token_revocations: Arc<dyn TokenRevocationRepository>,
    ) -> Self {
        Self {
            user_repo,
            document_repo,
            role_repo,
            token_revocations,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn document_repo(&self) -> Arc<dyn DocumentRepository> {
        self.services.document_repo.clone()
    }

    pub fn role_repo(&self) -> Arc<dyn RoleRepository> {
        self.services.role_repo.clone()
    }

    pub fn token_revocations(&self) -> Arc<dyn TokenRevocationRepository> {
        self.services.token_revocations.clone()
    }
}
