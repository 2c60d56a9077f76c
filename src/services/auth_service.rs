use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use serde_json::Value;
use tracing::{info, warn};

use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::models::{accounts, registrations};
use crate::utils::token::normalize_token;
use crate::utils::username;

const MAX_USERNAME_ATTEMPTS: i64 = 5;

pub struct AuthService;

impl AuthService {
    /// Valide un couple (token, device id). Appelé à chaque requête authentifiée.
    ///
    /// - token inconnu des comptes mais présent dans registrations => création du compte
    /// - compte sans appareil => liaison définitive à ce device id
    /// - compte lié à un autre appareil => DeviceMismatch
    pub async fn validate(
        db: &DatabaseConnection,
        token: Option<&str>,
        device_id: Option<&str>,
        device_info: Value,
    ) -> ApiResult<accounts::Model> {
        // 1. Les deux sont obligatoires, avant tout accès à la base
        let token = token.map(normalize_token).filter(|t| !t.is_empty());
        // Le device id est comparé tel quel : pas de normalisation
        let device_id = device_id.filter(|d| !d.trim().is_empty());
        let (Some(token), Some(device_id)) = (token, device_id) else {
            return Err(ApiError::MissingCredentials);
        };

        // 2. Compte existant, sinon activation depuis l'inscription en attente
        let account = match Self::find_account(db, &token).await? {
            Some(account) => account,
            None => Self::activate(db, &token).await?,
        };

        // 3. Vérification / liaison de l'appareil
        let account = Self::bind_device(db, account, device_id, device_info).await?;

        // 4. Dernière connexion
        Self::touch_last_login(db, account).await
    }

    async fn find_account(
        db: &DatabaseConnection,
        token: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::Token.eq(token))
            .one(db)
            .await
    }

    /// Première validation : crée le compte depuis l'inscription et la marque utilisée
    async fn activate(db: &DatabaseConnection, token: &str) -> ApiResult<accounts::Model> {
        let registration = registrations::Entity::find()
            .filter(registrations::Column::Token.eq(token))
            .one(db)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let base = username::base_from_email(&registration.email);

        for attempt in 0..MAX_USERNAME_ATTEMPTS {
            let candidate = username::with_suffix(&base, Utc::now().timestamp_millis() + attempt);

            match Self::promote(db, &registration, candidate).await {
                Ok(account) => {
                    info!(
                        account_id = account.id,
                        username = %account.username,
                        "account activated"
                    );
                    return Ok(account);
                }
                Err(err) if is_unique_violation(&err) => {
                    // Token déjà activé par une requête concurrente
                    if let Some(account) = Self::find_account(db, token).await? {
                        return Ok(account);
                    }
                    // Sinon c'est le username qui est pris : nouveau suffixe
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ApiError::Conflict("Could not allocate a unique username".to_string()))
    }

    async fn promote(
        db: &DatabaseConnection,
        registration: &registrations::Model,
        username: String,
    ) -> Result<accounts::Model, DbErr> {
        let txn = db.begin().await?;
        let now = Utc::now();

        let account = accounts::ActiveModel {
            username: Set(username),
            token: Set(registration.token.clone()),
            device_id: Set(None),
            device_info: Set(None),
            created_at: Set(now),
            last_login_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut pending: registrations::ActiveModel = registration.clone().into();
        pending.used = Set(true);
        pending.update(&txn).await?;

        txn.commit().await?;
        Ok(account)
    }

    /// La liaison est définitive : seul un device_id NULL peut être écrit
    async fn bind_device(
        db: &DatabaseConnection,
        account: accounts::Model,
        device_id: &str,
        device_info: Value,
    ) -> ApiResult<accounts::Model> {
        match account.device_id.as_deref() {
            Some(bound) if bound == device_id => return Ok(account),
            Some(_) => {
                warn!(account_id = account.id, "token used from another device");
                return Err(ApiError::DeviceMismatch);
            }
            None => {}
        }

        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::DeviceId, Expr::value(device_id))
            .col_expr(accounts::Column::DeviceInfo, Expr::value(device_info.clone()))
            .filter(accounts::Column::Id.eq(account.id))
            .filter(accounts::Column::DeviceId.is_null())
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            // Un autre appareil a gagné la course : on relit et on compare
            let current = accounts::Entity::find_by_id(account.id)
                .one(db)
                .await?
                .ok_or(ApiError::InvalidToken)?;

            return match current.device_id.as_deref() {
                Some(bound) if bound == device_id => Ok(current),
                _ => {
                    warn!(account_id = account.id, "lost device binding race");
                    Err(ApiError::DeviceMismatch)
                }
            };
        }

        info!(account_id = account.id, "device bound to account");
        Ok(accounts::Model {
            device_id: Some(device_id.to_string()),
            device_info: Some(device_info),
            ..account
        })
    }

    async fn touch_last_login(
        db: &DatabaseConnection,
        account: accounts::Model,
    ) -> ApiResult<accounts::Model> {
        let now = Utc::now();

        accounts::Entity::update_many()
            .col_expr(accounts::Column::LastLoginAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(account.id))
            .exec(db)
            .await?;

        Ok(accounts::Model { last_login_at: now, ..account })
    }
}
