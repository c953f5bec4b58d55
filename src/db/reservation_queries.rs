//! Reservation store. Every mutating query here performs its
//! precondition check and its write as one statement (a conditional
//! UPDATE keyed on the expected status, or a guarded INSERT), so a race
//! between two requests resolves inside Postgres instead of by
//! last-write-wins.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::matches::Match;
use crate::models::reservation::{Reservation, ReservationStatus};

pub async fn insert_reservation(
    pool: &PgPool,
    stadium_id: Uuid,
    owner_id: Uuid,
    requesting_team_id: Uuid,
    weekday: i32,
    session: &str,
    notes: Option<&str>,
) -> Result<Reservation, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations
            (id, stadium_id, owner_id, requesting_team_id, weekday, session, notes, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8, $8)
        RETURNING id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
                  status, selected_opponent_id, match_id, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(stadium_id)
    .bind(owner_id)
    .bind(requesting_team_id)
    .bind(weekday)
    .bind(session)
    .bind(notes)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn fetch_reservation(
    pool: &PgPool,
    reservation_id: Uuid,
) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
               status, selected_opponent_id, match_id, created_at, updated_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(reservation_id)
    .fetch_optional(pool)
    .await
}

/// Opponent team ids in insertion order.
pub async fn fetch_opponents(
    pool: &PgPool,
    reservation_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT team_id FROM reservation_opponents
        WHERE reservation_id = $1
        ORDER BY added_at, team_id
        "#,
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await
}

/// Opponent sets for a batch of reservations, keyed by reservation id.
pub async fn fetch_opponents_for(
    pool: &PgPool,
    reservation_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT reservation_id, team_id FROM reservation_opponents
        WHERE reservation_id = ANY($1)
        ORDER BY added_at, team_id
        "#,
    )
    .bind(reservation_ids)
    .fetch_all(pool)
    .await?;

    let mut by_reservation: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        let reservation_id: Uuid = row.get("reservation_id");
        let team_id: Uuid = row.get("team_id");
        by_reservation.entry(reservation_id).or_default().push(team_id);
    }
    Ok(by_reservation)
}

pub async fn list_reservations_for_owner(
    pool: &PgPool,
    owner_id: Uuid,
) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
               status, selected_opponent_id, match_id, created_at, updated_at
        FROM reservations
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

/// Reservations a team participates in: as requester, as a registered
/// opponent, or as the selected opponent.
pub async fn list_reservations_for_team(
    pool: &PgPool,
    team_id: Uuid,
) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
               status, selected_opponent_id, match_id, created_at, updated_at
        FROM reservations
        WHERE requesting_team_id = $1
           OR selected_opponent_id = $1
           OR id IN (SELECT reservation_id FROM reservation_opponents WHERE team_id = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all_reservations(pool: &PgPool) -> Result<Vec<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        SELECT id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
               status, selected_opponent_id, match_id, created_at, updated_at
        FROM reservations
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Owner review: compare-and-swap from `pending` to the decided status.
/// Returns None when the reservation was not pending at write time (or
/// does not exist); the caller re-reads to tell those apart.
pub async fn review_pending_reservation(
    pool: &PgPool,
    reservation_id: Uuid,
    decision: ReservationStatus,
) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
                  status, selected_opponent_id, match_id, created_at, updated_at
        "#,
    )
    .bind(reservation_id)
    .bind(decision)
    .fetch_optional(pool)
    .await
}

/// Register opponent interest, guarded on the reservation still taking
/// opponents. A duplicate add hits the ON CONFLICT arm and affects zero
/// rows, which the workflow treats as a success no-op.
pub async fn add_opponent_if_open(
    pool: &PgPool,
    reservation_id: Uuid,
    team_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO reservation_opponents (reservation_id, team_id)
        SELECT $1, $2
        WHERE EXISTS (
            SELECT 1 FROM reservations
            WHERE id = $1 AND status IN ('pending', 'approved')
        )
        ON CONFLICT (reservation_id, team_id) DO NOTHING
        "#,
    )
    .bind(reservation_id)
    .bind(team_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn opponent_exists(
    pool: &PgPool,
    reservation_id: Uuid,
    team_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservation_opponents
            WHERE reservation_id = $1 AND team_id = $2
        )
        "#,
    )
    .bind(reservation_id)
    .bind(team_id)
    .fetch_one(pool)
    .await
}

/// Finalize the reservation: select the opponent, flip to `matched` and
/// create the match, all in one transaction. The UPDATE is conditioned
/// on `status = 'approved'`, no opponent selected yet, and the opponent
/// being a registered entry, so of any number of concurrent callers at
/// most one observes an affected row. Returns None when the guard did
/// not hold; the caller re-reads to classify the failure.
pub async fn finalize_reservation(
    pool: &PgPool,
    reservation_id: Uuid,
    opponent_team_id: Uuid,
    finalized_by: Uuid,
) -> Result<Option<(Reservation, Match)>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET status = 'matched', selected_opponent_id = $2, updated_at = NOW()
        WHERE id = $1
          AND status = 'approved'
          AND selected_opponent_id IS NULL
          AND EXISTS (
              SELECT 1 FROM reservation_opponents
              WHERE reservation_id = $1 AND team_id = $2
          )
        RETURNING id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
                  status, selected_opponent_id, match_id, created_at, updated_at
        "#,
    )
    .bind(reservation_id)
    .bind(opponent_team_id)
    .fetch_optional(&mut *tx)
    .await?;

    let reservation = match reservation {
        Some(reservation) => reservation,
        None => {
            tx.rollback().await?;
            return Ok(None);
        }
    };

    let game = sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches
            (id, reservation_id, stadium_id, team_a_id, team_b_id, weekday, session, status, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'open', $8, NOW())
        RETURNING id, reservation_id, stadium_id, team_a_id, team_b_id, weekday, session,
                  status, created_by, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(reservation.id)
    .bind(reservation.stadium_id)
    .bind(reservation.requesting_team_id)
    .bind(opponent_team_id)
    .bind(reservation.weekday)
    .bind(&reservation.session)
    .bind(finalized_by)
    .fetch_one(&mut *tx)
    .await?;

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations
        SET match_id = $2
        WHERE id = $1
        RETURNING id, stadium_id, owner_id, requesting_team_id, weekday, session, notes,
                  status, selected_opponent_id, match_id, created_at, updated_at
        "#,
    )
    .bind(reservation.id)
    .bind(game.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some((reservation, game)))
}
