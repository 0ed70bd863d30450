use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                      // storage-assigned id
    pub uuid: Uuid,                   // external id, generated at registration
    pub email: String,                // unique
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    #[sqlx(default)]
    pub activated: Option<bool>,      // only set when explicitly projected
    pub created_at: OffsetDateTime,
}

impl User {
    /// True only when the flag was projected and set.
    pub fn is_activated(&self) -> bool {
        self.activated.unwrap_or(false)
    }
}

/// Fields supplied by registration; `activated` is left to the column default.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub uuid: Uuid,
}
