use actix_web::{web, HttpResponse};
use chrono::Utc;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::user::{RegistrationRequest, UserRole};
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool),
    fields(
        username = %user_form.username,
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
) -> HttpResponse {
    let role = user_form.role.unwrap_or(UserRole::Player);

    // Admin accounts are seeded out of band, never self-assigned
    if role == UserRole::Admin {
        return HttpResponse::Forbidden().json(ApiResponse::<()>::error(
            "The admin role cannot be requested at registration",
        ));
    }

    // Check if username or email is already taken
    let existing = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(&user_form.username)
    .bind(&user_form.email)
    .fetch_one(pool.get_ref())
    .await;

    match existing {
        Ok(true) => {
            return HttpResponse::Conflict().json(ApiResponse::<()>::error(
                "Username or email already registered",
            ));
        }
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Database error checking existing user: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to register user"));
        }
    }

    match insert_user(&user_form, role, &pool).await {
        Ok(_) => HttpResponse::Ok()
            .json(ApiResponse::<()>::success_message("User registered successfully")),
        Err(e) => {
            tracing::error!("Failed to insert user: {:?}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to register user"))
        }
    }
}

pub async fn insert_user(
    user_form: &web::Json<RegistrationRequest>,
    role: UserRole,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        "#,
    )
    .bind(user_id)
    .bind(&user_form.username)
    .bind(&user_form.email)
    .bind(hash_password(user_form.password.expose_secret()))
    .bind(role)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute user insert query: {:?}", e);
        e
    })?;

    Ok(())
}
