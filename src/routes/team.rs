// src/routes/team.rs
use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::booking::team_handler;
use crate::middleware::auth::Claims;
use crate::models::team::TeamRegistrationRequest;

/// Register a new team
#[post("")]
async fn register_team(
    team_request: web::Json<TeamRegistrationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    team_handler::register_new_team(team_request, pool, claims).await
}

/// Get all registered teams
#[get("")]
async fn get_all_teams(pool: web::Data<PgPool>) -> HttpResponse {
    team_handler::get_all_registered_teams(pool).await
}

/// Get team information
#[get("/{team_id}")]
async fn get_team_info(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> HttpResponse {
    let team_id = path.into_inner();
    team_handler::get_team_information(team_id, pool).await
}
