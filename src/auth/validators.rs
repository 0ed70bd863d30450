use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use crate::{
    auth::dto::{ActivateInput, ActivateRequest, RegisterInput, RegisterRequest},
    error::ApiError,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    Ok(email)
}

pub fn validate_before_register(req: RegisterRequest) -> Result<RegisterInput, ApiError> {
    let email = normalize_email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(RegisterInput {
        email,
        password: req.password,
    })
}

pub fn validate_before_activate(req: ActivateRequest) -> Result<ActivateInput, ApiError> {
    let email = normalize_email(&req.email)?;
    let activation_code = req.activation_code.trim().to_string();
    if activation_code.is_empty() {
        warn!(email = %email, "missing activation code");
        return Err(ApiError::Validation("Activation code is required".into()));
    }
    Ok(ActivateInput {
        email,
        activation_code,
    })
}
