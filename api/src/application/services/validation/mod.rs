use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::error::{AppError, AppResult};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("valid username regex"));

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TITLE_LEN: usize = 255;

/// Trims and lowercases; emails are stored normalized.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if EMAIL_RE.is_match(&email) {
        Ok(email)
    } else {
        Err(AppError::validation("a valid email address is required"))
    }
}

/// All-digit usernames are refused: a numeric path segment always resolves
/// as a user id.
pub fn username(username: &str) -> AppResult<String> {
    let username = username.trim();
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::validation(
            "username must be 3-32 characters of letters, digits, '.', '_' or '-'",
        ));
    }
    if username.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::validation("username cannot be only digits"));
    }
    Ok(username.to_string())
}

pub fn full_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(AppError::validation("full name is required"))
    } else {
        Ok(name.to_string())
    }
}

pub fn password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn document_title(title: &str) -> AppResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation("title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}
