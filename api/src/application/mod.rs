pub mod access;
pub mod dto;
pub mod error;
pub mod ports;
pub mod services;
pub mod use_cases;
