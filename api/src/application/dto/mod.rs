pub mod documents;
pub mod pagination;
