use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::team::{Team, TeamRegistrationRequest};
use crate::models::user::UserRole;

/// Register a new team
#[tracing::instrument(
    name = "Register team",
    skip(team_request, pool, claims),
    fields(
        team_name = %team_request.team_name,
        user = %claims.username
    )
)]
pub async fn register_new_team(
    team_request: web::Json<TeamRegistrationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    if let Err(validation_error) = team_request.validate() {
        tracing::warn!("Team registration validation failed: {}", validation_error);
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error(validation_error));
    }

    match claims.role {
        UserRole::Captain | UserRole::Admin => {}
        UserRole::Owner | UserRole::Player => {
            return HttpResponse::Forbidden().json(ApiResponse::<()>::error(
                "Only captains may register a team",
            ));
        }
    }

    let captain_id = match claims.user_id() {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID"));
        }
    };

    // Check if the captain already has a team
    let has_team = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM teams WHERE captain_id = $1)",
    )
    .bind(captain_id)
    .fetch_one(pool.get_ref())
    .await;

    match has_team {
        Ok(true) => {
            return HttpResponse::Conflict().json(ApiResponse::<()>::error(
                "User already has a registered team",
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Database error checking existing team: {}", e);
            return HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to check existing team registration",
            ));
        }
    }

    // Check if team name is already taken
    let sanitized_team_name = team_request.get_sanitized_name();
    let name_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM teams WHERE LOWER(team_name) = LOWER($1))",
    )
    .bind(&sanitized_team_name)
    .fetch_one(pool.get_ref())
    .await;

    match name_taken {
        Ok(true) => {
            return HttpResponse::Conflict()
                .json(ApiResponse::<()>::error("Team name already taken"));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Database error checking team name: {}", e);
            return HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to check team name availability",
            ));
        }
    }

    let now = Utc::now();
    let result = sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (id, captain_id, team_name, description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, captain_id, team_name, description, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(captain_id)
    .bind(&sanitized_team_name)
    .bind(&team_request.description)
    .bind(now)
    .fetch_one(pool.get_ref())
    .await;

    match result {
        Ok(team) => {
            tracing::info!(
                "Successfully registered team '{}' with ID: {}",
                team.team_name,
                team.id
            );
            HttpResponse::Created().json(ApiResponse::success(
                "Team registered successfully",
                team,
            ))
        }
        Err(e) => {
            tracing::error!("Failed to create team: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to register team"))
        }
    }
}

/// Get all registered teams
#[tracing::instrument(name = "Get all teams", skip(pool))]
pub async fn get_all_registered_teams(pool: web::Data<PgPool>) -> HttpResponse {
    let result = sqlx::query_as::<_, Team>(
        r#"
        SELECT id, captain_id, team_name, description, created_at, updated_at
        FROM teams
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(teams) => HttpResponse::Ok().json(ApiResponse::success(
            "Teams retrieved successfully",
            teams,
        )),
        Err(e) => {
            tracing::error!("Failed to fetch teams: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch teams"))
        }
    }
}

/// Get team information
#[tracing::instrument(name = "Get team", skip(pool), fields(team_id = %team_id))]
pub async fn get_team_information(team_id: Uuid, pool: web::Data<PgPool>) -> HttpResponse {
    let result = sqlx::query_as::<_, Team>(
        r#"
        SELECT id, captain_id, team_name, description, created_at, updated_at
        FROM teams
        WHERE id = $1
        "#,
    )
    .bind(team_id)
    .fetch_optional(pool.get_ref())
    .await;

    match result {
        Ok(Some(team)) => HttpResponse::Ok().json(ApiResponse::success(
            "Team retrieved successfully",
            team,
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found")),
        Err(e) => {
            tracing::error!("Failed to fetch team: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch team"))
        }
    }
}
