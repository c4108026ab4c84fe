pub mod passwords;
pub mod validation;
