use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload mailed to a freshly registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationClaims {
    pub id: i64,           // storage id
    pub email: String,
    pub uuid: Uuid,        // external id
    #[serde(default)]
    pub activation: bool,  // absent claim reads as false
    pub iat: usize,        // issued at (unix timestamp)
    pub exp: usize,        // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
