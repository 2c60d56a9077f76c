use actix_web::{put, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::models::dto::{AccountProfile, UpdateProfileRequest};
use crate::services::account_service::AccountService;

/// PUT /user/profile - Modifier username et préférences (PROTÉGÉE)
#[put("/profile")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let account =
        AccountService::update_profile(db.get_ref(), auth_user.account, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": AccountProfile::from(account)
    })))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(update_profile)
    );
}
