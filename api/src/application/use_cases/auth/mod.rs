pub mod authenticate;
pub mod login;
pub mod logout;
pub mod purge_revoked_tokens;
pub mod register;
