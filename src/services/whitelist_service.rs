use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::*;
use serde::Serialize;
use tracing::info;

use crate::db::is_unique_violation;
use crate::error::{ApiError, ApiResult};
use crate::models::dto::{AddWhitelistRequest, WhitelistPatchRequest};
use crate::models::{accounts, registrations, whitelist};
use crate::utils::email::normalize_email;

/// Statut dérivé d'une entrée : invitée, token envoyé, ou compte activé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistStatus {
    Invited,
    Sent,
    Registered,
}

#[derive(Debug, Serialize)]
pub struct WhitelistEntryView {
    #[serde(flatten)]
    pub entry: whitelist::Model,
    pub status: WhitelistStatus,
}

pub struct WhitelistService;

impl WhitelistService {
    pub async fn list(db: &DatabaseConnection) -> ApiResult<Vec<WhitelistEntryView>> {
        let entries = whitelist::Entity::find()
            .order_by_desc(whitelist::Column::AddedAt)
            .order_by_desc(whitelist::Column::Id)
            .all(db)
            .await?;

        let emails: Vec<String> = entries.iter().map(|e| e.email.clone()).collect();

        // email -> token des inscriptions existantes
        let tokens_by_email: HashMap<String, String> = registrations::Entity::find()
            .filter(registrations::Column::Email.is_in(emails))
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.email, r.token))
            .collect();

        let activated: HashSet<String> = accounts::Entity::find()
            .filter(accounts::Column::Token.is_in(tokens_by_email.values().cloned()))
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.token)
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let status = match tokens_by_email.get(&entry.email) {
                    Some(token) if activated.contains(token) => WhitelistStatus::Registered,
                    Some(_) => WhitelistStatus::Sent,
                    None => WhitelistStatus::Invited,
                };
                WhitelistEntryView { entry, status }
            })
            .collect())
    }

    pub async fn add(
        db: &DatabaseConnection,
        request: AddWhitelistRequest,
    ) -> ApiResult<whitelist::Model> {
        let email = normalize_email(request.email.as_deref())?;

        let existing = whitelist::Entity::find()
            .filter(whitelist::Column::Email.eq(&email))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(format!("{email} is already whitelisted")));
        }

        let entry = whitelist::ActiveModel {
            email: Set(email.clone()),
            name: Set(clean(request.name)),
            website: Set(clean(request.website)),
            note: Set(clean(request.note)),
            added_at: Set(Utc::now()),
            ..Default::default()
        };

        let entry = entry.insert(db).await.map_err(|err| conflict_or(err, &email))?;

        info!(email = %entry.email, id = entry.id, "whitelist entry added");
        Ok(entry)
    }

    /// Modification partielle. Une chaîne vide efface le champ optionnel.
    pub async fn patch(
        db: &DatabaseConnection,
        id: i32,
        patch: WhitelistPatchRequest,
    ) -> ApiResult<whitelist::Model> {
        if patch.is_empty() {
            return Err(ApiError::InvalidInput("No recognized field supplied".to_string()));
        }

        let entry = whitelist::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Whitelist entry {id} not found")))?;

        let mut active: whitelist::ActiveModel = entry.into();

        let mut new_email = None;
        if let Some(raw) = patch.email.as_deref() {
            let email = normalize_email(Some(raw))?;
            active.email = Set(email.clone());
            new_email = Some(email);
        }
        if patch.name.is_some() {
            active.name = Set(clean(patch.name));
        }
        if patch.website.is_some() {
            active.website = Set(clean(patch.website));
        }
        if patch.note.is_some() {
            active.note = Set(clean(patch.note));
        }

        let updated = active.update(db).await.map_err(|err| match &new_email {
            Some(email) => conflict_or(err, email),
            None => err.into(),
        })?;

        info!(id, "whitelist entry updated");
        Ok(updated)
    }

    pub async fn remove(db: &DatabaseConnection, id: i32) -> ApiResult<()> {
        let result = whitelist::Entity::delete_by_id(id).exec(db).await?;

        if result.rows_affected == 0 {
            return Err(ApiError::NotFound(format!("Whitelist entry {id} not found")));
        }

        info!(id, "whitelist entry removed");
        Ok(())
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn conflict_or(err: DbErr, email: &str) -> ApiError {
    if is_unique_violation(&err) {
        ApiError::Conflict(format!("{email} is already whitelisted"))
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn add_request(email: &str) -> AddWhitelistRequest {
        AddWhitelistRequest {
            email: Some(email.to_string()),
            name: Some("Jane".to_string()),
            website: None,
            note: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_normalizes_and_rejects_duplicates() {
        let db = test_support::memory_db().await;

        let entry = WhitelistService::add(&db, add_request("Jane@Example.com")).await.unwrap();
        assert_eq!(entry.email, "jane@example.com");
        assert_eq!(entry.name.as_deref(), Some("Jane"));
        assert!(entry.note.is_none());

        let err = WhitelistService::add(&db, add_request("jane@example.com ")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_patch() {
        let db = test_support::memory_db().await;
        let entry = WhitelistService::add(&db, add_request("jane@example.com")).await.unwrap();

        let empty = WhitelistService::patch(&db, entry.id, WhitelistPatchRequest::default()).await;
        assert!(matches!(empty, Err(ApiError::InvalidInput(_))));

        let missing = WhitelistService::patch(
            &db,
            entry.id + 100,
            WhitelistPatchRequest { note: Some("x".into()), ..Default::default() },
        )
        .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));

        let updated = WhitelistService::patch(
            &db,
            entry.id,
            WhitelistPatchRequest {
                website: Some("https://jane.coffee".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.website.as_deref(), Some("https://jane.coffee"));
        assert_eq!(updated.name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn test_patch_email_conflict() {
        let db = test_support::memory_db().await;
        WhitelistService::add(&db, add_request("a@example.com")).await.unwrap();
        let b = WhitelistService::add(&db, add_request("b@example.com")).await.unwrap();

        let err = WhitelistService::patch(
            &db,
            b.id,
            WhitelistPatchRequest { email: Some("A@example.com".into()), ..Default::default() },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_support::memory_db().await;
        let entry = WhitelistService::add(&db, add_request("jane@example.com")).await.unwrap();

        WhitelistService::remove(&db, entry.id).await.unwrap();
        let again = WhitelistService::remove(&db, entry.id).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_statuses() {
        let db = test_support::memory_db().await;
        test_support::seed_whitelist(&db, "invited@example.com").await;
        test_support::seed_whitelist(&db, "sent@example.com").await;
        test_support::seed_whitelist(&db, "registered@example.com").await;
        test_support::seed_registration(&db, "sent@example.com", "BREW-SENT22").await;
        test_support::seed_registration(&db, "registered@example.com", "BREW-REG222").await;
        test_support::seed_account(&db, "BREW-REG222", Some("abc123")).await;

        let entries = WhitelistService::list(&db).await.unwrap();
        let status_of = |email: &str| {
            entries
                .iter()
                .find(|view| view.entry.email == email)
                .map(|view| view.status)
                .unwrap()
        };

        assert_eq!(entries.len(), 3);
        assert_eq!(status_of("invited@example.com"), WhitelistStatus::Invited);
        assert_eq!(status_of("sent@example.com"), WhitelistStatus::Sent);
        assert_eq!(status_of("registered@example.com"), WhitelistStatus::Registered);
    }
}
