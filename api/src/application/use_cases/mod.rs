pub mod auth;
pub mod documents;
pub mod roles;
pub mod users;
