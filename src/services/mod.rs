pub mod account_service;
pub mod auth_service;
pub mod coffee_service;
pub mod mailer;
pub mod registration_service;
pub mod whitelist_service;
