//! Post-registration side effects.
//!
//! Registration hands an [`ActivationJob`] to the notifier and returns at once.
//! A single worker task drains the queue: it loads the activation template,
//! mints a token, renders the mail and dispatches it. Failures are logged per job
//! and the job is dropped.

use std::{path::PathBuf, sync::Arc};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{auth::jwt::ActivationKeys, mailer::Mailer, templates};

pub const ACTIVATION_SUBJECT: &str = "Please activate your account";

#[derive(Debug, Clone)]
pub struct ActivationJob {
    pub id: i64,
    pub email: String,
    pub uuid: Uuid,
}

/// Enqueuing side of the activation mail worker.
#[derive(Clone)]
pub struct ActivationNotifier {
    tx: mpsc::Sender<ActivationJob>,
}

struct NotifierWorker {
    keys: ActivationKeys,
    mailer: Arc<dyn Mailer>,
    template_path: PathBuf,
}

impl ActivationNotifier {
    /// Starts the worker on the current runtime.
    pub fn spawn(
        keys: ActivationKeys,
        mailer: Arc<dyn Mailer>,
        template_path: PathBuf,
        capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = NotifierWorker {
            keys,
            mailer,
            template_path,
        };
        tokio::spawn(worker.run(rx));
        Self { tx }
    }

    /// Never waits; a full or closed queue loses the job and logs it.
    pub fn enqueue(&self, job: ActivationJob) {
        match self.tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                warn!(user_id = job.id, email = %job.email, "activation queue full; mail dropped");
            }
            Err(TrySendError::Closed(job)) => {
                error!(user_id = job.id, email = %job.email, "activation worker gone; mail dropped");
            }
        }
    }
}

impl NotifierWorker {
    async fn run(self, mut rx: mpsc::Receiver<ActivationJob>) {
        while let Some(job) = rx.recv().await {
            let user_id = job.id;
            if let Err(e) = self.deliver(job).await {
                error!(user_id, error = %format!("{:#}", e), "activation mail failed");
            }
        }
        info!("activation worker stopped");
    }

    #[instrument(skip(self, job), fields(user_id = job.id))]
    async fn deliver(&self, job: ActivationJob) -> anyhow::Result<()> {
        let raw = templates::read_template(&self.template_path).await?;
        let activation_code = self.keys.sign_activation(job.id, &job.email, job.uuid)?;
        let html = templates::fill_template(
            &raw,
            &[
                ("email", job.email.as_str()),
                ("activationCode", activation_code.as_str()),
            ],
        );
        self.mailer
            .send_html(ACTIVATION_SUBJECT, &job.email, html)
            .await?;
        info!(email = %job.email, "activation mail sent");
        Ok(())
    }
}
