use lazy_static::lazy_static;
use regex::Regex;

use super::dto::RegisterRequest;
use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checked registration input: trimmed name, normalized email, raw password.
#[derive(Debug, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_registration(req: RegisterRequest) -> Result<NewAccount, AppError> {
    let name = req.nome.map(|n| n.trim().to_string()).unwrap_or_default();
    let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = req.senha.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::validation(
            "name, email and password are required",
        ));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("invalid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must have at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(NewAccount {
        name,
        email,
        password,
    })
}
