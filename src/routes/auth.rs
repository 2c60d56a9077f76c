use actix_web::{get, post, web, HttpRequest, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::middleware::{credentials_from_request, device_info_from_request, AuthUser};
use crate::models::dto::{AccountProfile, CredentialParams, RegisterRequest};
use crate::services::auth_service::AuthService;
use crate::services::mailer::Mailer;
use crate::services::registration_service::RegistrationService;

/// POST /auth/register - Demander un token (PUBLIC, email de la whitelist)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    let outcome = RegistrationService::register(
        db.get_ref(),
        mailer.get_ref(),
        &config.token_prefix,
        body.email.as_deref(),
    )
    .await?;

    let message = if outcome.resent {
        "Your existing token has been sent again"
    } else {
        "Your access token has been sent"
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "resent": outcome.resent,
        "message": message
    })))
}

/// POST /auth/validate - Valider token + appareil (PUBLIC)
/// Headers en priorité, body puis query en secours
#[post("/validate")]
pub async fn validate(
    req: HttpRequest,
    body: Option<web::Json<CredentialParams>>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let credentials = credentials_from_request(&req, body.map(web::Json::into_inner));

    let account = AuthService::validate(
        db.get_ref(),
        credentials.token.as_deref(),
        credentials.device_id.as_deref(),
        device_info_from_request(&req),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "valid": true,
        "user": AccountProfile::from(account)
    })))
}

/// GET /auth/me - Profil du compte courant (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": AccountProfile::from(auth_user.account)
    }))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(validate)
            .service(me)
    );
}
