use serde::Deserialize;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for account activation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub email: String,
    pub activation_code: String,
}

/// Validated registration input.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Validated activation input.
#[derive(Debug)]
pub struct ActivateInput {
    pub email: String,
    pub activation_code: String,
}
