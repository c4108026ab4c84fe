pub mod document_repository_sqlx;
pub mod role_repository_sqlx;
pub mod token_revocation_repository_sqlx;
pub mod user_repository_sqlx;
