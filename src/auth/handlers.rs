use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{ActivateRequest, RegisterRequest},
        jwt::ActivationKeys,
        notifier::ActivationJob,
        password::hash_password_async,
        repo_types::NewUser,
        validators::{validate_before_activate, validate_before_register},
    },
    error::{ApiError, Success},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/activate", post(activate))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Success, ApiError> {
    let Json(payload) = payload?;
    let input = validate_before_register(payload)?;

    let password_hash = hash_password_async(input.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::server("SERVER_ERROR", e)
    })?;

    let new_user = NewUser {
        email: input.email,
        password_hash,
        uuid: Uuid::new_v4(),
    };

    let user = state.users.create(new_user).await.map_err(|e| {
        error!(error = %e, kind = e.kind(), "create user failed");
        ApiError::from(e)
    })?;

    state.notifier.enqueue(ActivationJob {
        id: user.id,
        email: user.email.clone(),
        uuid: user.uuid,
    });

    info!(user_id = user.id, uuid = %user.uuid, email = %user.email, "user registered");
    Ok(Success::ok("Successfully registered user."))
}

#[instrument(skip(state, payload))]
pub async fn activate(
    State(state): State<AppState>,
    payload: Result<Json<ActivateRequest>, JsonRejection>,
) -> Result<Success, ApiError> {
    let Json(payload) = payload?;
    let input = validate_before_activate(payload)?;

    let keys = ActivationKeys::from_ref(&state);
    let claims = keys.verify(&input.activation_code).map_err(|e| {
        warn!(error = %e, email = %input.email, "activation code rejected");
        ApiError::InvalidActivationCode
    })?;

    if claims.email != input.email {
        warn!(email = %input.email, claim_email = %claims.email, "activation code issued for another email");
        return Err(ApiError::InvalidActivationCode);
    }

    if !claims.activation {
        warn!(email = %input.email, user_id = claims.id, "token carries no activation claim");
        return Err(ApiError::ActivationNotGranted);
    }

    let user = state
        .users
        .find_by_email_with_activation(&input.email)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_email_with_activation failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| {
            warn!(email = %input.email, "activation for unknown email");
            ApiError::NotFound("User not found".into())
        })?;

    if user.is_activated() {
        info!(user_id = user.id, "user already activated");
        return Ok(Success::ok("Successfully activated user."));
    }

    state.users.set_activated(user.id).await.map_err(|e| {
        error!(error = %e, user_id = user.id, "set_activated failed");
        ApiError::from(e)
    })?;

    info!(user_id = user.id, email = %user.email, "user activated");
    Ok(Success::ok("Successfully activated user."))
}
