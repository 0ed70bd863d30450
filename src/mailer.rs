use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MailConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_html(&self, subject: &str, to: &str, html: String) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: &'a str,
    html_content: String,
}

/// Sends through a transactional mail HTTP API (Brevo-compatible payload).
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
}

impl HttpMailer {
    pub fn new(cfg: &MailConfig, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("build mail http client")?;
        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            api_key,
            sender_email: cfg.sender_email.clone(),
            sender_name: cfg.sender_name.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_html(&self, subject: &str, to: &str, html: String) -> anyhow::Result<()> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![EmailAddress {
                email: to.to_string(),
                name: None,
            }],
            subject,
            html_content: html,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .context("mail api request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("mail api returned {}: {}", status, text);
        }
        debug!(to = %to, %status, "mail accepted");
        Ok(())
    }
}

/// Used when no mail API key is configured; the message only reaches the log.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_html(&self, subject: &str, to: &str, html: String) -> anyhow::Result<()> {
        info!(to = %to, subject = %subject, bytes = html.len(), "mail not sent (no MAIL_API_KEY)");
        debug!(html = %html, "mail body");
        Ok(())
    }
}

pub fn from_config(cfg: &MailConfig) -> anyhow::Result<std::sync::Arc<dyn Mailer>> {
    Ok(match &cfg.api_key {
        Some(key) => std::sync::Arc::new(HttpMailer::new(cfg, key.clone())?),
        None => std::sync::Arc::new(LogMailer),
    })
}

#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SentMail {
    pub subject: String,
    pub to: String,
    pub html: String,
}

/// Keeps every message in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<SentMail>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_html(&self, subject: &str, to: &str, html: String) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentMail {
            subject: subject.to_string(),
            to: to.to_string(),
            html,
        });
        Ok(())
    }
}
