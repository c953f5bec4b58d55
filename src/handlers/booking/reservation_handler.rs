//! HTTP edge of the reservation workflow: resolves the actor from the
//! validated claims, delegates to the workflow service, and maps the
//! domain error taxonomy onto status codes. Response shapes follow the
//! web client's contract exactly.

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::booking::{Actor, ReservationWorkflow};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::reservation::{
    CreateReservationRequest, FinalizedReservationResponse, OpponentTeamRequest,
    StatusUpdateRequest,
};

fn actor_from_claims(claims: &Claims) -> Result<Actor, HttpResponse> {
    match claims.user_id() {
        Some(user_id) => Ok(Actor {
            user_id,
            role: claims.role,
        }),
        None => Err(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Invalid user ID"))),
    }
}

#[tracing::instrument(
    name = "Create reservation request",
    skip(request, pool, claims),
    fields(username = %claims.username)
)]
pub async fn create_reservation(
    request: web::Json<CreateReservationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let workflow = ReservationWorkflow::new(pool.get_ref().clone());
    match workflow.create_reservation(&request, &actor).await {
        Ok(reservation) => HttpResponse::Created().json(json!({ "reservation": reservation })),
        Err(e) => e.to_response(),
    }
}

#[tracing::instrument(
    name = "List reservations request",
    skip(pool, claims),
    fields(username = %claims.username)
)]
pub async fn list_reservations(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let workflow = ReservationWorkflow::new(pool.get_ref().clone());
    match workflow.list_reservations(&actor).await {
        Ok(reservations) => HttpResponse::Ok().json(json!({ "reservations": reservations })),
        Err(e) => e.to_response(),
    }
}

#[tracing::instrument(
    name = "Update reservation status request",
    skip(request, pool, claims),
    fields(username = %claims.username, reservation_id = %reservation_id)
)]
pub async fn update_reservation_status(
    reservation_id: Uuid,
    request: web::Json<StatusUpdateRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let workflow = ReservationWorkflow::new(pool.get_ref().clone());
    match workflow
        .update_status(reservation_id, request.status, &actor)
        .await
    {
        Ok(reservation) => HttpResponse::Ok().json(json!({ "reservation": reservation })),
        Err(e) => e.to_response(),
    }
}

#[tracing::instrument(
    name = "Add opponent team request",
    skip(request, pool, claims),
    fields(username = %claims.username, reservation_id = %reservation_id)
)]
pub async fn add_opponent_team(
    reservation_id: Uuid,
    request: web::Json<OpponentTeamRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let workflow = ReservationWorkflow::new(pool.get_ref().clone());
    match workflow
        .add_opponent_team(reservation_id, request.team_id, &actor)
        .await
    {
        Ok(reservation) => HttpResponse::Ok().json(json!({ "reservation": reservation })),
        Err(e) => e.to_response(),
    }
}

#[tracing::instrument(
    name = "Select opponent team request",
    skip(request, pool, claims),
    fields(username = %claims.username, reservation_id = %reservation_id)
)]
pub async fn select_opponent_team(
    reservation_id: Uuid,
    request: web::Json<OpponentTeamRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    let actor = match actor_from_claims(&claims) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    let workflow = ReservationWorkflow::new(pool.get_ref().clone());
    match workflow
        .select_opponent_team(reservation_id, request.team_id, &actor)
        .await
    {
        Ok((reservation, game)) => HttpResponse::Ok().json(FinalizedReservationResponse {
            reservation,
            game,
        }),
        Err(e) => e.to_response(),
    }
}
