use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod handlers;
pub mod jwt;
#[cfg(test)]
pub mod memory;
pub mod notifier;
mod password;
pub mod repo;
pub mod repo_types;
mod validators;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
