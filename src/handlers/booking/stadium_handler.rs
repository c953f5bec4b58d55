use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::stadium::{Stadium, StadiumRegistrationRequest};
use crate::models::user::UserRole;

/// Register a new stadium
#[tracing::instrument(
    name = "Register stadium",
    skip(stadium_request, pool, claims),
    fields(
        stadium_name = %stadium_request.name,
        user = %claims.username
    )
)]
pub async fn register_new_stadium(
    stadium_request: web::Json<StadiumRegistrationRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> HttpResponse {
    if let Err(validation_error) = stadium_request.validate() {
        tracing::warn!("Stadium registration validation failed: {}", validation_error);
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error(validation_error));
    }

    match claims.role {
        UserRole::Owner | UserRole::Admin => {}
        UserRole::Captain | UserRole::Player => {
            return HttpResponse::Forbidden().json(ApiResponse::<()>::error(
                "Only stadium owners may list stadiums",
            ));
        }
    }

    let owner_id = match claims.user_id() {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error("Invalid user ID"));
        }
    };

    let sanitized_name = stadium_request.get_sanitized_name();

    // Check if this owner already listed a stadium under the same name
    let existing = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM stadiums WHERE owner_id = $1 AND LOWER(name) = LOWER($2))",
    )
    .bind(owner_id)
    .bind(&sanitized_name)
    .fetch_one(pool.get_ref())
    .await;

    match existing {
        Ok(true) => {
            return HttpResponse::Conflict().json(ApiResponse::<()>::error(
                "You already listed a stadium with this name",
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Database error checking stadium name: {}", e);
            return HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
                "Failed to check stadium name availability",
            ));
        }
    }

    let now = Utc::now();
    let result = sqlx::query_as::<_, Stadium>(
        r#"
        INSERT INTO stadiums (id, owner_id, name, location, description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING id, owner_id, name, location, description, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&sanitized_name)
    .bind(stadium_request.location.trim())
    .bind(&stadium_request.description)
    .bind(now)
    .fetch_one(pool.get_ref())
    .await;

    match result {
        Ok(stadium) => {
            tracing::info!("Successfully listed stadium '{}' with ID: {}", stadium.name, stadium.id);
            HttpResponse::Created().json(ApiResponse::success(
                "Stadium registered successfully",
                stadium,
            ))
        }
        Err(e) => {
            tracing::error!("Failed to create stadium: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to register stadium"))
        }
    }
}

/// Get all listed stadiums
#[tracing::instrument(name = "Get all stadiums", skip(pool))]
pub async fn get_all_stadiums(pool: web::Data<PgPool>) -> HttpResponse {
    let result = sqlx::query_as::<_, Stadium>(
        r#"
        SELECT id, owner_id, name, location, description, created_at, updated_at
        FROM stadiums
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await;

    match result {
        Ok(stadiums) => HttpResponse::Ok().json(ApiResponse::success(
            "Stadiums retrieved successfully",
            stadiums,
        )),
        Err(e) => {
            tracing::error!("Failed to fetch stadiums: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch stadiums"))
        }
    }
}

/// Get stadium information
#[tracing::instrument(name = "Get stadium", skip(pool), fields(stadium_id = %stadium_id))]
pub async fn get_stadium_information(stadium_id: Uuid, pool: web::Data<PgPool>) -> HttpResponse {
    let result = sqlx::query_as::<_, Stadium>(
        r#"
        SELECT id, owner_id, name, location, description, created_at, updated_at
        FROM stadiums
        WHERE id = $1
        "#,
    )
    .bind(stadium_id)
    .fetch_optional(pool.get_ref())
    .await;

    match result {
        Ok(Some(stadium)) => HttpResponse::Ok().json(ApiResponse::success(
            "Stadium retrieved successfully",
            stadium,
        )),
        Ok(None) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error("Stadium not found"))
        }
        Err(e) => {
            tracing::error!("Failed to fetch stadium: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to fetch stadium"))
        }
    }
}
