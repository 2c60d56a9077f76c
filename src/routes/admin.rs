use actix_web::{delete, get, patch, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminGuard;
use crate::models::dto::{AddWhitelistRequest, WhitelistPatchRequest};
use crate::services::whitelist_service::WhitelistService;

fn validated<T: Validate>(body: web::Json<T>) -> ApiResult<T> {
    let body = body.into_inner();
    body.validate()
        .map_err(|errors| ApiError::InvalidInput(errors.to_string()))?;
    Ok(body)
}

/// GET /api/admin/whitelist - Entrées + statut (invited | sent | registered)
#[get("")]
pub async fn list_whitelist(
    _admin: AdminGuard,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let entries = WhitelistService::list(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "entries": entries
    })))
}

/// POST /api/admin/whitelist - Ajouter un email
#[post("")]
pub async fn add_whitelist(
    _admin: AdminGuard,
    body: web::Json<AddWhitelistRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let entry = WhitelistService::add(db.get_ref(), validated(body)?).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "entry": entry
    })))
}

/// PATCH /api/admin/whitelist/{id} - Modifier une entrée
#[patch("/{id}")]
pub async fn patch_whitelist(
    _admin: AdminGuard,
    path: web::Path<i32>,
    body: web::Json<WhitelistPatchRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let entry = WhitelistService::patch(db.get_ref(), path.into_inner(), validated(body)?).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "entry": entry
    })))
}

/// DELETE /api/admin/whitelist/{id} - Retirer une entrée
#[delete("/{id}")]
pub async fn remove_whitelist(
    _admin: AdminGuard,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    WhitelistService::remove(db.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true
    })))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/whitelist")
            .service(list_whitelist)
            .service(add_whitelist)
            .service(patch_whitelist)
            .service(remove_whitelist)
    );
}
