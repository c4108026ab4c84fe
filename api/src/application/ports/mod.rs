pub mod document_repository;
pub mod role_repository;
pub mod token_revocation_repository;
pub mod user_repository;
