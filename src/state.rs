use crate::auth::{jwt::ActivationKeys, notifier::ActivationNotifier, repo::{PgUserStore, UserStore}};
use crate::config::AppConfig;
use crate::{db, mailer};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub notifier: ActivationNotifier,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.database_url).await?;
        db::migrate(&pool).await;
        let users = Arc::new(PgUserStore::new(pool)) as Arc<dyn UserStore>;

        let mailer = mailer::from_config(&config.mail)?;
        if config.mail.api_key.is_none() {
            tracing::warn!("MAIL_API_KEY not set; activation mails will only be logged");
        }

        Ok(Self::from_parts(config, users, mailer))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn mailer::Mailer>,
    ) -> Self {
        let notifier = ActivationNotifier::spawn(
            ActivationKeys::from_config(&config.jwt),
            mailer,
            config.activation_template_path.clone(),
            config.notifier_queue_capacity,
        );
        Self {
            config,
            users,
            notifier,
        }
    }
}
