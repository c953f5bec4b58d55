// src/models/reservation.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::matches::MatchView;

/// Lifecycle of a reservation. `pending -> approved -> matched`, with
/// `rejected` reachable from `pending` only. `matched` and `rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Matched,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Approved => "approved",
            ReservationStatus::Rejected => "rejected",
            ReservationStatus::Matched => "matched",
        };
        write!(f, "{}", s)
    }
}

/// One team's claim on a stadium's recurring weekly slot, as stored.
/// Opponent interest lives in the `reservation_opponents` table and is
/// joined in when building a [`ReservationView`].
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Reservation {
    pub id: Uuid,
    pub stadium_id: Uuid,
    pub owner_id: Uuid,
    pub requesting_team_id: Uuid,
    pub weekday: i32,
    pub session: String,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub selected_opponent_id: Option<Uuid>,
    pub match_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for POST /reservation. Captains may omit `teamId`, in
/// which case their own team is the requester; admins opening a
/// reservation on a captain's behalf must name the team.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub stadium_id: Uuid,
    pub team_id: Option<Uuid>,
    pub weekday: i32,
    pub session: String,
    pub notes: Option<String>,
}

/// Request body for PUT /reservation/{id}/status
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StatusUpdateRequest {
    pub status: ReservationStatus,
}

/// Request body for the add-opponent and select-opponent endpoints
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OpponentTeamRequest {
    pub team_id: Uuid,
}

/// Wire representation of a reservation, opponent set included.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub id: Uuid,
    pub stadium_id: Uuid,
    pub owner_id: Uuid,
    pub requesting_team: Uuid,
    pub weekday: i32,
    pub session: String,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    /// Insertion order preserved for deterministic display.
    pub opponent_teams: Vec<Uuid>,
    pub selected_opponent: Option<Uuid>,
    #[serde(rename = "match")]
    pub match_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationView {
    pub fn from_parts(reservation: Reservation, opponent_teams: Vec<Uuid>) -> Self {
        Self {
            id: reservation.id,
            stadium_id: reservation.stadium_id,
            owner_id: reservation.owner_id,
            requesting_team: reservation.requesting_team_id,
            weekday: reservation.weekday,
            session: reservation.session,
            notes: reservation.notes,
            status: reservation.status,
            opponent_teams,
            selected_opponent: reservation.selected_opponent_id,
            match_id: reservation.match_id,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

/// Response body for the select-opponent endpoint: the finalized
/// reservation together with the match it spawned.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedReservationResponse {
    pub reservation: ReservationView,
    #[serde(rename = "match")]
    pub game: MatchView,
}
