// ============================================================================
// MODÈLE : WHITELIST
// ============================================================================
//
// Colonnes de la table whitelist:
//   - id (INTEGER, PRIMARY KEY)
//   - email (VARCHAR, UNIQUE, NOT NULL) - toujours en minuscules
//   - name, website, note (VARCHAR, NULL)
//   - added_at (TIMESTAMP, NOT NULL)
//
// Points d'attention:
//   - Seul un email présent ici peut recevoir un token
//   - Géré uniquement par l'admin (/api/admin/whitelist)
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "whitelist")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    pub name: Option<String>,

    pub website: Option<String>,

    pub note: Option<String>,

    pub added_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
