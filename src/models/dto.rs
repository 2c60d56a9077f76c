//pour les requêtes et réponses de l'API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{accounts, coffee_records};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
}

/// Token + device id envoyés dans le body (ou la query) quand les headers manquent
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialParams {
    pub token: Option<String>,
    pub device_id: Option<String>,
}

/// Profil public d'un compte (jamais le token)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: i32,
    pub username: String,
    pub device_id: Option<String>,
    pub grinder_preference: Option<String>,
    pub method_preference: Option<String>,
    pub water_hardness: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountProfile {
    fn from(account: accounts::Model) -> Self {
        AccountProfile {
            id: account.id,
            username: account.username,
            device_id: account.device_id,
            grinder_preference: account.grinder_preference,
            method_preference: account.method_preference,
            water_hardness: account.water_hardness,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: Option<String>,

    #[validate(length(max = 100))]
    pub grinder_preference: Option<String>,

    #[validate(length(max = 100))]
    pub method_preference: Option<String>,

    #[validate(range(min = 0, max = 50))]
    pub water_hardness: Option<i32>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.grinder_preference.is_none()
            && self.method_preference.is_none()
            && self.water_hardness.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveCoffeesRequest {
    pub records: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoffeeRecordResponse {
    pub id: i32,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl From<coffee_records::Model> for CoffeeRecordResponse {
    fn from(record: coffee_records::Model) -> Self {
        CoffeeRecordResponse {
            id: record.id,
            payload: record.payload,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddWhitelistRequest {
    pub email: Option<String>,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub website: Option<String>,

    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

/// PATCH partiel : seuls les champs présents sont modifiés
#[derive(Debug, Default, Deserialize, Validate)]
pub struct WhitelistPatchRequest {
    pub email: Option<String>,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub website: Option<String>,

    #[validate(length(max = 2000))]
    pub note: Option<String>,
}

impl WhitelistPatchRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.website.is_none() && self.note.is_none()
    }
}
