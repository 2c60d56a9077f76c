use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::accounts;
use crate::models::dto::CredentialParams;
use crate::services::auth_service::AuthService;
use crate::utils::device::describe_device;

pub const DEVICE_ID_HEADER: &str = "X-Device-Id";
pub const DEVICE_NAME_HEADER: &str = "X-Device-Name";
pub const TOKEN_HEADER: &str = "X-Auth-Token";

/// Token et device id trouvés dans la requête (pas encore validés)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: Option<String>,
    pub device_id: Option<String>,
}

/// Valeur brute du header, ignorée si vide
fn raw_header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    raw_header(req, name).map(str::trim)
}

/// Ordre de priorité : headers, puis body (si fourni), puis query string
pub fn credentials_from_request(req: &HttpRequest, body: Option<CredentialParams>) -> Credentials {
    let header_token = header(req, "Authorization")
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .or_else(|| header(req, TOKEN_HEADER))
        .map(|token| token.trim().to_string());
    // Le device id est transmis tel quel, la comparaison est exacte
    let header_device = raw_header(req, DEVICE_ID_HEADER).map(str::to_string);

    let body = body.unwrap_or_default();
    let query = web::Query::<CredentialParams>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    Credentials {
        token: header_token.or(body.token).or(query.token),
        device_id: header_device.or(body.device_id).or(query.device_id),
    }
}

pub fn device_info_from_request(req: &HttpRequest) -> Value {
    describe_device(header(req, "User-Agent"), header(req, DEVICE_NAME_HEADER))
}

/// Compte authentifié (token + appareil validés)
/// Utilisé comme extracteur dans les routes protégées
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account: accounts::Model,
}

/// Chaque extraction repasse par AuthService::validate (liaison + last_login)
impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let credentials = credentials_from_request(req, None);
        let device_info = device_info_from_request(req);
        let db = req.app_data::<web::Data<DatabaseConnection>>().cloned();

        Box::pin(async move {
            let db = db.ok_or_else(|| {
                ApiError::Internal("database handle not registered".to_string())
            })?;

            let account = AuthService::validate(
                db.get_ref(),
                credentials.token.as_deref(),
                credentials.device_id.as_deref(),
                device_info,
            )
            .await?;

            Ok(AuthUser { account })
        })
    }
}
