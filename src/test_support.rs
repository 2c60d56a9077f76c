// Helpers partagés par les tests : base SQLite en mémoire, données de départ, mailer factice

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::config::AppConfig;
use crate::db;
use crate::models::{accounts, registrations, whitelist};
use crate::services::mailer::{MailError, Mailer};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Base SQLite en mémoire avec le schéma complet.
/// Sans max_connections explicite, sea-orm garde une seule connexion pour :memory:.
pub async fn memory_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db::init_schema(&db).await.unwrap();
    db
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "ADMIN_KEY" => Some(ADMIN_KEY.to_string()),
        _ => None,
    })
    .unwrap()
}

pub async fn seed_whitelist(db: &DatabaseConnection, email: &str) -> whitelist::Model {
    whitelist::ActiveModel {
        email: Set(email.to_string()),
        added_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_registration(
    db: &DatabaseConnection,
    email: &str,
    token: &str,
) -> registrations::Model {
    registrations::ActiveModel {
        email: Set(email.to_string()),
        token: Set(token.to_string()),
        used: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Compte déjà actif, éventuellement déjà lié à un appareil
pub async fn seed_account(
    db: &DatabaseConnection,
    token: &str,
    device_id: Option<&str>,
) -> accounts::Model {
    let now = Utc::now();
    accounts::ActiveModel {
        username: Set(format!("user_{}", token.to_lowercase().replace('-', ""))),
        token: Set(token.to_string()),
        device_id: Set(device_id.map(str::to_string)),
        created_at: Set(now),
        last_login_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Mailer qui garde les envois en mémoire (ou échoue à la demande)
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_token(&self, to_email: &str, token: &str) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Rejected { status: 503, body: "provider down".to_string() });
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), token.to_string()));
        Ok(())
    }
}
