//! Read-only lookups against the stadium/team directories. The
//! reservation workflow uses these to validate foreign keys before it
//! mutates anything; a missing row is surfaced to the caller as NotFound
//! so a client that raced its own directory write can simply retry.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::stadium::Stadium;
use crate::models::team::Team;

pub async fn fetch_stadium(pool: &PgPool, stadium_id: Uuid) -> Result<Option<Stadium>, sqlx::Error> {
    sqlx::query_as::<_, Stadium>(
        r#"
        SELECT id, owner_id, name, location, description, created_at, updated_at
        FROM stadiums
        WHERE id = $1
        "#,
    )
    .bind(stadium_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_team(pool: &PgPool, team_id: Uuid) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, captain_id, team_name, description, created_at, updated_at
        FROM teams
        WHERE id = $1
        "#,
    )
    .bind(team_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_team_by_captain(
    pool: &PgPool,
    captain_id: Uuid,
) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, captain_id, team_name, description, created_at, updated_at
        FROM teams
        WHERE captain_id = $1
        "#,
    )
    .bind(captain_id)
    .fetch_optional(pool)
    .await
}
