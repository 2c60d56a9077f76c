// connexion BD + création du schéma

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
    SqlErr,
};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::models::{accounts, coffee_records, registrations, whitelist};

/// Ouvre le pool. Le backend (PostgreSQL ou SQLite) est choisi d'après l'URL.
pub async fn establish_connection(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

/// Crée les tables depuis les entités si elles n'existent pas encore.
/// L'ordre compte : accounts avant coffee_records (clé étrangère).
pub async fn init_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, whitelist::Entity).await?;
    create_table(db, registrations::Entity).await?;
    create_table(db, accounts::Entity).await?;
    create_table(db, coffee_records::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statement = Schema::new(backend)
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned();

    db.execute(backend.build(&statement)).await?;
    Ok(())
}

pub async fn close(db: DatabaseConnection) -> Result<(), DbErr> {
    db.close().await?;
    info!("database connection closed");
    Ok(())
}

/// Violation d'une contrainte UNIQUE (email, token ou username déjà pris)
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
