pub mod delete_user;
pub mod ensure_admin;
pub mod get_user;
pub mod list_users;
pub mod search_users;
pub mod update_user;
