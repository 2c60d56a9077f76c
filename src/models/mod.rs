// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table avec SeaORM (PostgreSQL ou SQLite).
//
// Liste des modules:
//   - health : Health check API
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//   - whitelist : Emails autorisés à s'inscrire à la beta
//   - registrations : Inscriptions en attente (token envoyé, pas encore activé)
//   - accounts : Comptes actifs, liés à un seul appareil
//   - coffee_records : Fiches café d'un compte (payload JSON opaque)
//
// Points d'attention:
//   - Le schéma est créé depuis les entités au démarrage (db::init_schema)
//   - Les contraintes UNIQUE (email, token, username) sont dans les entités
//
// ============================================================================

pub mod health;
pub mod dto;
pub mod whitelist;
pub mod registrations;
pub mod accounts;
pub mod coffee_records;
