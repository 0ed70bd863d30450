use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub activation_ttl_seconds: i64,
}

/// Transactional mail API settings. Without an API key mails are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub activation_template_path: PathBuf,
    pub notifier_queue_capacity: usize,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "regmail".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "regmail-users".into()),
            activation_ttl_seconds: env_parse("ACTIVATION_TTL_SECONDS", 600),
        };
        let mail = MailConfig {
            api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.brevo.com/v3/smtp/email".into()),
            api_key: env_non_empty("MAIL_API_KEY"),
            sender_email: std::env::var("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@regmail.local".into()),
            sender_name: env_non_empty("MAIL_SENDER_NAME"),
        };
        let activation_template_path = std::env::var("ACTIVATION_TEMPLATE_PATH")
            .unwrap_or_else(|_| "templates/activation_email.html".into())
            .into();
        Ok(Self {
            database_url,
            jwt,
            mail,
            activation_template_path,
            notifier_queue_capacity: env_parse("NOTIFIER_QUEUE_CAPACITY", 256),
        })
    }
}
