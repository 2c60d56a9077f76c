use chrono::Utc;
use sea_orm::*;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::coffee_records;

/// Lignes par INSERT. 3 paramètres liés par ligne : on reste loin des
/// plafonds SQLite (32766) et Postgres (65535).
const INSERT_CHUNK_SIZE: usize = 1000;

pub struct CoffeeService;

impl CoffeeService {
    /// Fiches d'un compte, les plus récentes d'abord.
    /// À date égale (même sauvegarde) l'ordre d'envoi est conservé.
    pub async fn list(
        db: &DatabaseConnection,
        account_id: i32,
    ) -> ApiResult<Vec<coffee_records::Model>> {
        let records = coffee_records::Entity::find()
            .filter(coffee_records::Column::AccountId.eq(account_id))
            .order_by_desc(coffee_records::Column::CreatedAt)
            .order_by_asc(coffee_records::Column::Id)
            .all(db)
            .await?;

        Ok(records)
    }

    /// Remplace TOUTES les fiches du compte, dans une seule transaction.
    /// Une liste vide efface tout. Retourne le nombre de fiches insérées.
    pub async fn replace_all(
        db: &DatabaseConnection,
        account_id: i32,
        records: Vec<Value>,
    ) -> ApiResult<usize> {
        // 1. Valider avant d'écrire quoi que ce soit
        if let Some(index) = records.iter().position(|record| !record.is_object()) {
            return Err(ApiError::InvalidInput(format!(
                "Record at index {index} is not a JSON object"
            )));
        }

        let saved = records.len();

        // 2. Delete + insert. Toute erreur abandonne la transaction (rollback au drop).
        let txn = db.begin().await?;

        coffee_records::Entity::delete_many()
            .filter(coffee_records::Column::AccountId.eq(account_id))
            .exec(&txn)
            .await?;

        // Même horodatage pour toute la sauvegarde, insérée par paquets
        let now = Utc::now();
        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let rows = chunk.iter().map(|payload| coffee_records::ActiveModel {
                account_id: Set(account_id),
                payload: Set(payload.clone()),
                created_at: Set(now),
                ..Default::default()
            });

            coffee_records::Entity::insert_many(rows).exec(&txn).await?;
        }

        txn.commit().await?;

        info!(account_id, saved, "coffee records replaced");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use serde_json::json;

    #[tokio::test]
    async fn test_replace_then_list() {
        let db = test_support::memory_db().await;
        let account = test_support::seed_account(&db, "BREW-COFFEE", Some("abc123")).await;

        let saved = CoffeeService::replace_all(
            &db,
            account.id,
            vec![json!({ "name": "Ethiopia Guji" }), json!({ "name": "Colombia Huila" })],
        )
        .await
        .unwrap();
        assert_eq!(saved, 2);

        let replacement = vec![json!({ "name": "Kenya AA", "rating": 4 })];
        let saved = CoffeeService::replace_all(&db, account.id, replacement).await.unwrap();
        assert_eq!(saved, 1);

        let records = CoffeeService::list(&db, account.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload["name"], "Kenya AA");
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_account() {
        let db = test_support::memory_db().await;
        let alice = test_support::seed_account(&db, "BREW-ALICE2", Some("a")).await;
        let bob = test_support::seed_account(&db, "BREW-BOB234", Some("b")).await;

        CoffeeService::replace_all(&db, alice.id, vec![json!({ "name": "Alice's" })])
            .await
            .unwrap();
        CoffeeService::replace_all(&db, bob.id, vec![]).await.unwrap();

        assert_eq!(CoffeeService::list(&db, alice.id).await.unwrap().len(), 1);
        assert!(CoffeeService::list(&db, bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_large_save_is_split_into_chunks() {
        let db = test_support::memory_db().await;
        let account = test_support::seed_account(&db, "BREW-BULK22", Some("abc123")).await;

        let records: Vec<Value> = (0..12_000).map(|i| json!({ "n": i })).collect();
        let saved = CoffeeService::replace_all(&db, account.id, records).await.unwrap();
        assert_eq!(saved, 12_000);

        let stored = CoffeeService::list(&db, account.id).await.unwrap();
        assert_eq!(stored.len(), 12_000);
        // Ordre d'envoi conservé d'un paquet à l'autre
        assert_eq!(stored[0].payload["n"], 0);
        assert_eq!(stored[11_999].payload["n"], 11_999);
    }

    #[tokio::test]
    async fn test_empty_set_clears_everything() {
        let db = test_support::memory_db().await;
        let account = test_support::seed_account(&db, "BREW-EMPTY2", Some("abc123")).await;

        CoffeeService::replace_all(&db, account.id, vec![json!({ "name": "Old" })])
            .await
            .unwrap();
        let saved = CoffeeService::replace_all(&db, account.id, vec![]).await.unwrap();

        assert_eq!(saved, 0);
        assert!(CoffeeService::list(&db, account.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_object_payload_is_rejected_without_writing() {
        let db = test_support::memory_db().await;
        let account = test_support::seed_account(&db, "BREW-REJECT", Some("abc123")).await;
        CoffeeService::replace_all(&db, account.id, vec![json!({ "name": "Keep me" })])
            .await
            .unwrap();

        let mixed = vec![json!({ "name": "ok" }), json!("just a string")];
        let err = CoffeeService::replace_all(&db, account.id, mixed).await.unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        let records = CoffeeService::list(&db, account.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload["name"], "Keep me");
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_delete() {
        let db = test_support::memory_db().await;
        let account = test_support::seed_account(&db, "BREW-ROLLBK", Some("abc123")).await;
        CoffeeService::replace_all(&db, account.id, vec![json!({ "name": "Original" })])
            .await
            .unwrap();

        // Simule une panne en plein insert
        db.execute_unprepared(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON coffee_records \
             WHEN NEW.payload LIKE '%poison%' \
             BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
        )
        .await
        .unwrap();

        let result = CoffeeService::replace_all(
            &db,
            account.id,
            vec![json!({ "name": "New" }), json!({ "name": "poison" })],
        )
        .await;
        assert!(result.is_err());

        let records = CoffeeService::list(&db, account.id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload["name"], "Original");
    }
}
