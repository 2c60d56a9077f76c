// ============================================================================
// MODÈLE : REGISTRATIONS (inscriptions en attente)
// ============================================================================
//
// Colonnes de la table registrations:
//   - id (INTEGER, PRIMARY KEY)
//   - email (VARCHAR, UNIQUE, NOT NULL)
//   - token (VARCHAR, UNIQUE, NOT NULL) - format PREFIX-XXXXXX
//   - used (BOOLEAN, NOT NULL) - passe à true à la première validation
//   - created_at (TIMESTAMP, NOT NULL)
//
// Workflow:
//   1. POST /api/auth/register avec un email de la whitelist
//   2. Backend génère le token et insère la ligne (ou renvoie le token existant)
//   3. Le token part par mail
//   4. Première validation du token => création du compte, used = true
//
// Points d'attention:
//   - Une seule ligne par email (re-register = renvoi du même token)
//   - Jamais supprimée par le flow normal
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub token: String,

    pub used: bool,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
