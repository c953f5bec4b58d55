// src/routes/reservation.rs
use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::handlers::booking::reservation_handler;
use crate::middleware::auth::Claims;
use crate::models::reservation::{
    CreateReservationRequest, OpponentTeamRequest, StatusUpdateRequest,
};

/// Open a new reservation on a stadium slot
#[post("")]
async fn create_reservation(
    request: web::Json<CreateReservationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    reservation_handler::create_reservation(request, pool, claims).await
}

/// List reservations visible to the caller (role-scoped)
#[get("")]
async fn list_reservations(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    reservation_handler::list_reservations(pool, claims).await
}

/// Owner review: approve or reject a pending reservation
#[put("/{reservation_id}/status")]
async fn update_reservation_status(
    path: web::Path<Uuid>,
    request: web::Json<StatusUpdateRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let reservation_id = path.into_inner();
    reservation_handler::update_reservation_status(reservation_id, request, pool, claims).await
}

/// Register an opponent team's interest (idempotent)
#[put("/{reservation_id}/add-opponent")]
async fn add_opponent_team(
    path: web::Path<Uuid>,
    request: web::Json<OpponentTeamRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let reservation_id = path.into_inner();
    reservation_handler::add_opponent_team(reservation_id, request, pool, claims).await
}

/// Lock in an opponent and create the match
#[put("/{reservation_id}/select-opponent")]
async fn select_opponent_team(
    path: web::Path<Uuid>,
    request: web::Json<OpponentTeamRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let reservation_id = path.into_inner();
    reservation_handler::select_opponent_team(reservation_id, request, pool, claims).await
}
