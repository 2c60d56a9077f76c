// ============================================================================
// MODÈLE : ACCOUNTS
// ============================================================================
//
// Colonnes de la table accounts:
//   - id (INTEGER, PRIMARY KEY)
//   - username (VARCHAR, UNIQUE, NOT NULL) - dérivé de l'email à l'activation
//   - token (VARCHAR, UNIQUE, NOT NULL) - le token de l'inscription d'origine
//   - device_id (VARCHAR, NULL) - fixé une seule fois, jamais modifié ensuite
//   - device_info (JSON, NULL)
//   - grinder_preference, method_preference (VARCHAR, NULL)
//   - water_hardness (INTEGER, NULL) - 0 à 50
//   - created_at, last_login_at (TIMESTAMP, NOT NULL)
//
// Points d'attention:
//   - Créé paresseusement à la première validation du token
//   - ON DELETE CASCADE vers coffee_records
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    #[serde(skip_serializing)] // Le token ne ressort jamais dans les réponses
    pub token: String,

    pub device_id: Option<String>,

    pub device_info: Option<Json>,

    pub grinder_preference: Option<String>,

    pub method_preference: Option<String>,

    pub water_hardness: Option<i32>,

    pub created_at: DateTimeUtc,

    pub last_login_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::coffee_records::Entity")]
    CoffeeRecords,
}

impl Related<super::coffee_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoffeeRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
