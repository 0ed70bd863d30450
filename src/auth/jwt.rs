use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::ActivationClaims, config::JwtConfig, state::AppState};

/// Signs and verifies activation tokens.
#[derive(Clone)]
pub struct ActivationKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl ActivationKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            activation_ttl_seconds,
        } = cfg.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs(activation_ttl_seconds.max(0) as u64),
        }
    }
}

impl FromRef<AppState> for ActivationKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl ActivationKeys {
    pub fn sign_activation(&self, id: i64, email: &str, uuid: uuid::Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = ActivationClaims {
            id,
            email: email.to_string(),
            uuid,
            activation: true,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = self.sign_claims(&claims)?;
        debug!(user_id = id, "activation token signed");
        Ok(token)
    }

    pub(crate) fn sign_claims(&self, claims: &ActivationClaims) -> anyhow::Result<String> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Checks signature, expiry (no leeway), issuer and audience.
    pub fn verify(&self, token: &str) -> anyhow::Result<ActivationClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<ActivationClaims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.id, "activation token verified");
        Ok(data.claims)
    }
}
