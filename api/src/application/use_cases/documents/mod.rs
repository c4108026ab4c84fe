pub mod create_document;
pub mod delete_document;
pub mod get_document;
pub mod list_documents;
pub mod list_user_documents;
pub mod search_documents;
pub mod update_document;
