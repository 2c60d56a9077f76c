use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;

use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::models::dto::{CoffeeRecordResponse, SaveCoffeesRequest};
use crate::services::coffee_service::CoffeeService;

/// GET /api/coffees - Fiches du compte courant
#[get("")]
pub async fn list_coffees(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let records: Vec<CoffeeRecordResponse> = CoffeeService::list(db.get_ref(), auth_user.account.id)
        .await?
        .into_iter()
        .map(CoffeeRecordResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "records": records
    })))
}

/// POST /api/coffees - Remplacer toutes les fiches (liste vide = tout effacer)
#[post("")]
pub async fn save_coffees(
    auth_user: AuthUser,
    body: web::Json<SaveCoffeesRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let records = body.into_inner().records;
    let saved = CoffeeService::replace_all(db.get_ref(), auth_user.account.id, records).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "saved": saved
    })))
}

pub fn coffee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/coffees")
            .service(list_coffees)
            .service(save_coffees)
    );
}
