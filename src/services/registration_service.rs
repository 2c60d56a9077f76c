use chrono::Utc;
use sea_orm::*;
use tracing::{info, warn};

use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::models::{accounts, registrations, whitelist};
use crate::services::mailer::Mailer;
use crate::utils::email::normalize_email;
use crate::utils::token::generate_token;

/// Nouveaux tirages quand le token existe déjà (pré-contrôle)
const MAX_TOKEN_RETRIES: usize = 10;
/// Tentatives d'insertion quand la contrainte UNIQUE rejette malgré tout
const MAX_INSERT_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub email: String,
    pub resent: bool,
}

enum Issued {
    New(registrations::Model),
    Existing(registrations::Model),
}

pub struct RegistrationService;

impl RegistrationService {
    /// Inscription d'un email de la whitelist.
    /// Idempotent : si un token existe déjà pour cet email, il est renvoyé tel quel.
    pub async fn register(
        db: &DatabaseConnection,
        mailer: &dyn Mailer,
        token_prefix: &str,
        raw_email: Option<&str>,
    ) -> ApiResult<RegistrationOutcome> {
        // 1. Normaliser l'email
        let email = normalize_email(raw_email)?;

        // 2. Vérifier la whitelist (aucun token sinon)
        let whitelisted = whitelist::Entity::find()
            .filter(whitelist::Column::Email.eq(&email))
            .one(db)
            .await?;

        if whitelisted.is_none() {
            warn!(email = %email, "registration refused, email not whitelisted");
            return Err(ApiError::NotWhitelisted);
        }

        // 3. Inscription existante => on renvoie le même token
        let issued = match Self::find_by_email(db, &email).await? {
            Some(existing) => Issued::Existing(existing),
            None => {
                let mut next_token = || generate_token(token_prefix);
                Self::insert_registration(db, &email, &mut next_token).await?
            }
        };

        // 4. Envoi du mail. En cas d'échec la ligne reste en base (pas de rollback).
        let (registration, resent) = match issued {
            Issued::New(registration) => (registration, false),
            Issued::Existing(registration) => (registration, true),
        };

        mailer.send_token(&email, &registration.token).await?;

        info!(email = %email, resent, "access token issued");
        Ok(RegistrationOutcome { email, resent })
    }

    async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<registrations::Model>, DbErr> {
        registrations::Entity::find()
            .filter(registrations::Column::Email.eq(email))
            .one(db)
            .await
    }

    /// `next_token` tire un nouveau token candidat à chaque appel
    async fn insert_registration<F>(
        db: &DatabaseConnection,
        email: &str,
        next_token: &mut F,
    ) -> ApiResult<Issued>
    where
        F: FnMut() -> String,
    {
        for _ in 0..MAX_INSERT_ATTEMPTS {
            let token = Self::unused_token(db, next_token).await?;

            let pending = registrations::ActiveModel {
                email: Set(email.to_string()),
                token: Set(token),
                used: Set(false),
                created_at: Set(Utc::now()),
                ..Default::default()
            };

            match pending.insert(db).await {
                Ok(registration) => return Ok(Issued::New(registration)),
                Err(err) if is_unique_violation(&err) => {
                    // Soit le même email inscrit en parallèle, soit un token en double
                    if let Some(existing) = Self::find_by_email(db, email).await? {
                        return Ok(Issued::Existing(existing));
                    }
                    warn!(email, "token collided at insert, drawing a new one");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApiError::Internal(format!(
            "could not store a registration for {email} after {MAX_INSERT_ATTEMPTS} attempts"
        )))
    }

    /// Tire un token absent de la base. Après MAX_TOKEN_RETRIES collisions on
    /// continue quand même : la contrainte UNIQUE à l'insertion fait le reste.
    async fn unused_token<F>(db: &DatabaseConnection, next_token: &mut F) -> ApiResult<String>
    where
        F: FnMut() -> String,
    {
        let mut token = next_token();

        for _ in 0..MAX_TOKEN_RETRIES {
            if !Self::token_exists(db, &token).await? {
                return Ok(token);
            }
            token = next_token();
        }

        warn!("token pre-check kept colliding, relying on the unique constraint");
        Ok(token)
    }

    async fn token_exists(db: &DatabaseConnection, token: &str) -> Result<bool, DbErr> {
        let pending = registrations::Entity::find()
            .filter(registrations::Column::Token.eq(token))
            .count(db)
            .await?;
        if pending > 0 {
            return Ok(true);
        }

        let active = accounts::Entity::find()
            .filter(accounts::Column::Token.eq(token))
            .count(db)
            .await?;
        Ok(active > 0)
    }
}
