//! Reservation workflow service: the sole authority for legal state
//! transitions on a reservation. Handlers never touch the reservation
//! tables directly; everything goes through here.
//!
//! The service holds no state of its own beyond the connection pool, so
//! any number of instances can serve requests concurrently. Precondition
//! failures are detected before any write is attempted, and every write
//! is a conditional statement, so a check that passed here and was
//! invalidated by a concurrent request fails again at the store and is
//! reclassified against a fresh read.

use sqlx::PgPool;
use uuid::Uuid;

use crate::booking::error::BookingError;
use crate::booking::transitions;
use crate::db::{directory, reservation_queries};
use crate::models::matches::MatchView;
use crate::models::reservation::{
    CreateReservationRequest, Reservation, ReservationStatus, ReservationView,
};
use crate::models::user::UserRole;

/// The (role, identity) pair the authorization gate resolved from the
/// bearer credential.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

pub struct ReservationWorkflow {
    pool: PgPool,
}

impl ReservationWorkflow {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a new claim on a stadium slot. The stadium's owner is
    /// denormalized onto the reservation so later permission checks
    /// don't need a directory lookup.
    #[tracing::instrument(name = "Create reservation", skip(self, request, actor), fields(stadium_id = %request.stadium_id))]
    pub async fn create_reservation(
        &self,
        request: &CreateReservationRequest,
        actor: &Actor,
    ) -> Result<ReservationView, BookingError> {
        if !(0..=6).contains(&request.weekday) {
            return Err(BookingError::Validation(
                "weekday must be between 0 and 6".to_string(),
            ));
        }
        if request.session.trim().is_empty() {
            return Err(BookingError::Validation(
                "session cannot be empty".to_string(),
            ));
        }

        // Captains default to their own team; admins acting on a
        // captain's behalf must name the requesting team.
        let team = match (actor.role, request.team_id) {
            (UserRole::Owner, _) | (UserRole::Player, _) => {
                return Err(BookingError::Forbidden(
                    "Only captains and admins may create reservations",
                ));
            }
            (_, Some(team_id)) => directory::fetch_team(&self.pool, team_id)
                .await?
                .ok_or(BookingError::NotFound("team"))?,
            (UserRole::Captain, None) => {
                directory::fetch_team_by_captain(&self.pool, actor.user_id)
                    .await?
                    .ok_or(BookingError::NotFound("team"))?
            }
            (UserRole::Admin, None) => {
                return Err(BookingError::Validation(
                    "teamId is required when an admin opens a reservation".to_string(),
                ));
            }
        };

        if actor.role == UserRole::Captain && team.captain_id != actor.user_id {
            return Err(BookingError::Forbidden(
                "Only the team's captain may open a reservation for it",
            ));
        }

        let stadium = directory::fetch_stadium(&self.pool, request.stadium_id)
            .await?
            .ok_or(BookingError::NotFound("stadium"))?;

        let reservation = reservation_queries::insert_reservation(
            &self.pool,
            stadium.id,
            stadium.owner_id,
            team.id,
            request.weekday,
            &request.session,
            request.notes.as_deref(),
        )
        .await?;

        tracing::info!("Created reservation {} with status pending", reservation.id);
        Ok(ReservationView::from_parts(reservation, Vec::new()))
    }

    /// Reservations visible to the caller, scoped by role: owners see
    /// claims on their stadiums, captains see reservations their team
    /// participates in, admins see everything.
    #[tracing::instrument(name = "List reservations", skip(self, actor), fields(role = %actor.role))]
    pub async fn list_reservations(
        &self,
        actor: &Actor,
    ) -> Result<Vec<ReservationView>, BookingError> {
        let reservations = match actor.role {
            UserRole::Admin => reservation_queries::list_all_reservations(&self.pool).await?,
            UserRole::Owner => {
                reservation_queries::list_reservations_for_owner(&self.pool, actor.user_id).await?
            }
            UserRole::Captain => {
                match directory::fetch_team_by_captain(&self.pool, actor.user_id).await? {
                    Some(team) => {
                        reservation_queries::list_reservations_for_team(&self.pool, team.id).await?
                    }
                    None => Vec::new(),
                }
            }
            UserRole::Player => {
                return Err(BookingError::Forbidden(
                    "Players without a team have no reservations to list",
                ));
            }
        };

        self.build_views(reservations).await
    }

    /// Owner review of a pending reservation: approve or reject.
    #[tracing::instrument(name = "Update reservation status", skip(self, actor), fields(reservation_id = %reservation_id, decision = %decision))]
    pub async fn update_status(
        &self,
        reservation_id: Uuid,
        decision: ReservationStatus,
        actor: &Actor,
    ) -> Result<ReservationView, BookingError> {
        if !transitions::is_review_decision(decision) {
            return Err(BookingError::Validation(
                "status must be either approved or rejected".to_string(),
            ));
        }

        let reservation = self.fetch_reservation(reservation_id).await?;

        match actor.role {
            UserRole::Admin => {}
            UserRole::Owner => {
                if reservation.owner_id != actor.user_id {
                    return Err(BookingError::Forbidden(
                        "Only the stadium's owner may review this reservation",
                    ));
                }
            }
            UserRole::Captain | UserRole::Player => {
                return Err(BookingError::Forbidden(
                    "Only the stadium's owner may review reservations",
                ));
            }
        }

        if !transitions::can_review(reservation.status) {
            return Err(BookingError::InvalidTransition {
                current: reservation.status,
            });
        }

        // The write re-checks `pending`; a concurrent review loses here.
        let updated =
            reservation_queries::review_pending_reservation(&self.pool, reservation_id, decision)
                .await?;

        match updated {
            Some(reservation) => {
                tracing::info!("Reservation {} is now {}", reservation.id, reservation.status);
                self.build_view(reservation).await
            }
            None => {
                let current = self.fetch_reservation(reservation_id).await?.status;
                Err(BookingError::InvalidTransition { current })
            }
        }
    }

    /// Register a team's interest in playing against the requester.
    /// Adding the same team twice is a success no-op so flaky clients
    /// can retry freely.
    #[tracing::instrument(name = "Add opponent team", skip(self, actor), fields(reservation_id = %reservation_id, team_id = %opponent_team_id))]
    pub async fn add_opponent_team(
        &self,
        reservation_id: Uuid,
        opponent_team_id: Uuid,
        actor: &Actor,
    ) -> Result<ReservationView, BookingError> {
        let reservation = self.fetch_reservation(reservation_id).await?;

        let team = directory::fetch_team(&self.pool, opponent_team_id)
            .await?
            .ok_or(BookingError::NotFound("team"))?;

        match actor.role {
            UserRole::Admin => {}
            UserRole::Captain => {
                if team.captain_id != actor.user_id {
                    return Err(BookingError::Forbidden(
                        "Only the opponent team's captain may register its interest",
                    ));
                }
            }
            UserRole::Owner | UserRole::Player => {
                return Err(BookingError::Forbidden(
                    "Only captains and admins may add opponent teams",
                ));
            }
        }

        if opponent_team_id == reservation.requesting_team_id {
            return Err(BookingError::Conflict(
                "A team cannot be its own opponent",
            ));
        }

        if !transitions::accepts_opponents(reservation.status) {
            return Err(BookingError::InvalidTransition {
                current: reservation.status,
            });
        }

        let inserted =
            reservation_queries::add_opponent_if_open(&self.pool, reservation_id, opponent_team_id)
                .await?;

        if inserted == 0 {
            // Zero affected rows is either the idempotent duplicate case
            // or a transition that raced us; a fresh read tells them apart.
            let already_registered =
                reservation_queries::opponent_exists(&self.pool, reservation_id, opponent_team_id)
                    .await?;
            if !already_registered {
                let current = self.fetch_reservation(reservation_id).await?.status;
                return Err(BookingError::InvalidTransition { current });
            }
        } else {
            tracing::info!(
                "Team {} registered interest in reservation {}",
                opponent_team_id,
                reservation_id
            );
        }

        let reservation = self.fetch_reservation(reservation_id).await?;
        self.build_view(reservation).await
    }

    /// Lock in one of the registered opponents. Atomically transitions
    /// the reservation to `matched` and creates exactly one match; the
    /// second of two concurrent calls surfaces `Conflict`.
    #[tracing::instrument(name = "Select opponent team", skip(self, actor), fields(reservation_id = %reservation_id, team_id = %opponent_team_id))]
    pub async fn select_opponent_team(
        &self,
        reservation_id: Uuid,
        opponent_team_id: Uuid,
        actor: &Actor,
    ) -> Result<(ReservationView, MatchView), BookingError> {
        let reservation = self.fetch_reservation(reservation_id).await?;

        self.check_finalize_permission(&reservation, actor).await?;

        if reservation.selected_opponent_id.is_some() {
            return Err(BookingError::Conflict(
                "An opponent has already been selected for this reservation",
            ));
        }

        if !transitions::can_finalize(reservation.status) {
            return Err(BookingError::InvalidTransition {
                current: reservation.status,
            });
        }

        if !reservation_queries::opponent_exists(&self.pool, reservation_id, opponent_team_id)
            .await?
        {
            return Err(BookingError::NotFound("opponent team"));
        }

        let finalized = reservation_queries::finalize_reservation(
            &self.pool,
            reservation_id,
            opponent_team_id,
            actor.user_id,
        )
        .await?;

        match finalized {
            Some((reservation, game)) => {
                tracing::info!(
                    "Reservation {} matched: {} vs {}, match {}",
                    reservation.id,
                    game.team_a_id,
                    game.team_b_id,
                    game.id
                );
                let view = self.build_view(reservation).await?;
                Ok((view, MatchView::from(game)))
            }
            None => {
                // The conditional write refused; classify against the
                // state a concurrent request left behind.
                let current = self.fetch_reservation(reservation_id).await?;
                if current.selected_opponent_id.is_some() {
                    return Err(BookingError::Conflict(
                        "An opponent has already been selected for this reservation",
                    ));
                }
                if !transitions::can_finalize(current.status) {
                    return Err(BookingError::InvalidTransition {
                        current: current.status,
                    });
                }
                Err(BookingError::NotFound("opponent team"))
            }
        }
    }

    /// Finalization is open to the three roles with a stake in the match:
    /// the stadium owner, the requesting team's captain, and admins.
    async fn check_finalize_permission(
        &self,
        reservation: &Reservation,
        actor: &Actor,
    ) -> Result<(), BookingError> {
        match actor.role {
            UserRole::Admin => Ok(()),
            UserRole::Owner => {
                if reservation.owner_id == actor.user_id {
                    Ok(())
                } else {
                    Err(BookingError::Forbidden(
                        "Only the stadium's owner may finalize this reservation",
                    ))
                }
            }
            UserRole::Captain => {
                let team = directory::fetch_team(&self.pool, reservation.requesting_team_id)
                    .await?
                    .ok_or(BookingError::NotFound("team"))?;
                if team.captain_id == actor.user_id {
                    Ok(())
                } else {
                    Err(BookingError::Forbidden(
                        "Only the requesting team's captain may finalize this reservation",
                    ))
                }
            }
            UserRole::Player => Err(BookingError::Forbidden(
                "Players may not finalize reservations",
            )),
        }
    }

    async fn fetch_reservation(&self, reservation_id: Uuid) -> Result<Reservation, BookingError> {
        reservation_queries::fetch_reservation(&self.pool, reservation_id)
            .await?
            .ok_or(BookingError::NotFound("reservation"))
    }

    async fn build_view(&self, reservation: Reservation) -> Result<ReservationView, BookingError> {
        let opponents =
            reservation_queries::fetch_opponents(&self.pool, reservation.id).await?;
        Ok(ReservationView::from_parts(reservation, opponents))
    }

    async fn build_views(
        &self,
        reservations: Vec<Reservation>,
    ) -> Result<Vec<ReservationView>, BookingError> {
        let ids: Vec<Uuid> = reservations.iter().map(|r| r.id).collect();
        let mut opponents = reservation_queries::fetch_opponents_for(&self.pool, &ids).await?;
        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let teams = opponents.remove(&reservation.id).unwrap_or_default();
                ReservationView::from_parts(reservation, teams)
            })
            .collect())
    }
}
