use actix_web::HttpResponse;
use serde_json::json;

use crate::models::common::ApiResponse;
use crate::models::reservation::ReservationStatus;

/// Failure taxonomy of the reservation workflow.
///
/// `Unauthenticated` has no variant here: missing or invalid credentials
/// are rejected by the auth middleware before a handler runs.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("operation is not legal while the reservation is {current}")]
    InvalidTransition { current: ReservationStatus },

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl BookingError {
    /// Translate the error into its HTTP response. The current status is
    /// included on transition failures so the client can resynchronize
    /// its view; storage failures are logged and surface as an opaque 500.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            BookingError::NotFound(what) => HttpResponse::NotFound()
                .json(ApiResponse::<()>::error(format!("{} not found", what))),
            BookingError::Forbidden(msg) => {
                HttpResponse::Forbidden().json(ApiResponse::<()>::error(*msg))
            }
            BookingError::InvalidTransition { current } => {
                HttpResponse::Conflict().json(json!({
                    "success": false,
                    "message": self.to_string(),
                    "currentStatus": current,
                }))
            }
            BookingError::Conflict(msg) => {
                HttpResponse::Conflict().json(ApiResponse::<()>::error(*msg))
            }
            BookingError::Validation(msg) => {
                HttpResponse::BadRequest().json(ApiResponse::<()>::error(msg.clone()))
            }
            BookingError::Database(e) => {
                tracing::error!("Storage failure in reservation workflow: {:?}", e);
                HttpResponse::InternalServerError()
                    .json(ApiResponse::<()>::error("Internal server error"))
            }
        }
    }
}
