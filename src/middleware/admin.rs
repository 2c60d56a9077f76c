use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::config::AppConfig;
use crate::error::ApiError;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Garde des routes /api/admin : secret partagé, distinct des tokens utilisateurs
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl FromRequest for AdminGuard {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let expected = req
            .app_data::<web::Data<AppConfig>>()
            .and_then(|config| config.admin_key.clone());

        // Pas de clé configurée => admin désactivé
        let Some(expected) = expected else {
            return ready(Err(ApiError::Unauthorized("Admin access is disabled".to_string())));
        };

        let provided = req
            .headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
            ready(Ok(AdminGuard))
        } else {
            warn!(path = req.path(), "rejected admin request");
            ready(Err(ApiError::Unauthorized("Invalid admin key".to_string())))
        }
    }
}
