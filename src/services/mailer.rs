use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MailConfig;
use crate::error::ApiError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const SUBJECT: &str = "Your coffee journal access token";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::UpstreamUnavailable(err.to_string())
    }
}

//trait = Interface vers le fournisseur mail
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Envoie le token d'accès à l'adresse donnée
    async fn send_token(&self, to_email: &str, token: &str) -> Result<(), MailError>;
}

/// Corps du mail (texte brut, pas de template)
pub fn token_message(token: &str) -> String {
    format!(
        "Welcome to the coffee journal beta!\n\n\
         Your access token: {token}\n\n\
         Enter it in the app to activate your account. \
         The token is tied to the first device that uses it."
    )
}

/// Envoi via l'API HTTP du fournisseur (POST JSON + clé en Bearer)
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_token(&self, to_email: &str, token: &str) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": self.config.from,
                "to": [to_email],
                "subject": SUBJECT,
                "text": token_message(token),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status: status.as_u16(), body });
        }

        info!(to = to_email, "access token mailed");
        Ok(())
    }
}

/// Mailer de dev : aucun envoi, juste un log
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_token(&self, to_email: &str, token: &str) -> Result<(), MailError> {
        warn!(to = to_email, "mail not configured, access token not delivered");
        debug!(to = to_email, token, "undelivered access token");
        Ok(())
    }
}

pub fn build_mailer(config: Option<&MailConfig>) -> Result<Arc<dyn Mailer>, MailError> {
    match config {
        Some(config) => Ok(Arc::new(HttpMailer::new(config.clone())?)),
        None => Ok(Arc::new(LogMailer)),
    }
}
