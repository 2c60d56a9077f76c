use sea_orm::*;
use tracing::info;
use validator::Validate;

use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::models::accounts;
use crate::models::dto::UpdateProfileRequest;
use crate::utils::username;

pub struct AccountService;

impl AccountService {
    /// Met à jour le profil (username + préférences café).
    /// Le device_id n'est jamais modifiable ici.
    pub async fn update_profile(
        db: &DatabaseConnection,
        account: accounts::Model,
        request: UpdateProfileRequest,
    ) -> ApiResult<accounts::Model> {
        // 1. Valider la requête
        if request.is_empty() {
            return Err(ApiError::InvalidInput("No recognized field supplied".to_string()));
        }
        request
            .validate()
            .map_err(|errors| ApiError::InvalidInput(errors.to_string()))?;

        let account_id = account.id;
        let mut active: accounts::ActiveModel = account.into();

        // 2. Username : format + unicité
        if let Some(new_username) = request.username.as_deref().map(str::trim) {
            if !username::is_valid(new_username) {
                return Err(ApiError::InvalidInput(
                    "Username must be 3-30 characters of letters, digits or underscore".to_string(),
                ));
            }

            let taken = accounts::Entity::find()
                .filter(accounts::Column::Username.eq(new_username))
                .filter(accounts::Column::Id.ne(account_id))
                .count(db)
                .await?;
            if taken > 0 {
                return Err(ApiError::Conflict(format!("Username {new_username} is already taken")));
            }

            active.username = Set(new_username.to_string());
        }

        // 3. Préférences
        if let Some(grinder) = request.grinder_preference {
            active.grinder_preference = Set(Some(grinder));
        }
        if let Some(method) = request.method_preference {
            active.method_preference = Set(Some(method));
        }
        if let Some(hardness) = request.water_hardness {
            active.water_hardness = Set(Some(hardness));
        }

        let updated = active.update(db).await.map_err(|err| {
            if is_unique_violation(&err) {
                ApiError::Conflict("Username is already taken".to_string())
            } else {
                err.into()
            }
        })?;

        info!(account_id, "profile updated");
        Ok(updated)
    }
}
