// src/models/matches.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Open,
    Requested,
    Accepted,
    Completed,
}

/// The finalized pairing spawned by selecting an opponent on a
/// reservation. Created exactly once per reservation.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Match {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub stadium_id: Uuid,
    pub team_a_id: Uuid,
    pub team_b_id: Uuid,
    pub weekday: i32,
    pub session: String,
    pub status: MatchStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a match.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub stadium_id: Uuid,
    pub team_a: Uuid,
    pub team_b: Uuid,
    pub weekday: i32,
    pub session: String,
    pub status: MatchStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Match> for MatchView {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            reservation_id: m.reservation_id,
            stadium_id: m.stadium_id,
            team_a: m.team_a_id,
            team_b: m.team_b_id,
            weekday: m.weekday,
            session: m.session,
            status: m.status,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}
