// src/routes/stadium.rs
use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::booking::stadium_handler;
use crate::middleware::auth::Claims;
use crate::models::stadium::StadiumRegistrationRequest;

/// List a new stadium
#[post("")]
async fn register_stadium(
    stadium_request: web::Json<StadiumRegistrationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    stadium_handler::register_new_stadium(stadium_request, pool, claims).await
}

/// Get all listed stadiums
#[get("")]
async fn get_all_stadiums(pool: web::Data<PgPool>) -> HttpResponse {
    stadium_handler::get_all_stadiums(pool).await
}

/// Get stadium information
#[get("/{stadium_id}")]
async fn get_stadium_info(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> HttpResponse {
    let stadium_id = path.into_inner();
    stadium_handler::get_stadium_information(stadium_id, pool).await
}
