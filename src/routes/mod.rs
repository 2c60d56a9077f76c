pub mod admin;
pub mod auth;
pub mod coffee;
pub mod health;
pub mod user;


use actix_web::web;

use crate::error::ApiError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(user::user_routes)
            .configure(coffee::coffee_routes)
            .configure(admin::admin_routes)
    );
}

/// Body JSON invalide ou trop gros => invalid_input (même format que les autres erreurs)
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into())
}
