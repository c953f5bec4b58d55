//! Pure transition rules for the reservation state machine.
//!
//! All matches are exhaustive on purpose: adding a status forces every
//! rule here to be revisited at compile time.

use crate::models::reservation::ReservationStatus;

/// Terminal states admit no further transition.
pub fn is_terminal(status: ReservationStatus) -> bool {
    match status {
        ReservationStatus::Pending | ReservationStatus::Approved => false,
        ReservationStatus::Rejected | ReservationStatus::Matched => true,
    }
}

/// The owner may review (approve or reject) only a pending reservation.
pub fn can_review(status: ReservationStatus) -> bool {
    match status {
        ReservationStatus::Pending => true,
        ReservationStatus::Approved
        | ReservationStatus::Rejected
        | ReservationStatus::Matched => false,
    }
}

/// A review decision may only land on `approved` or `rejected`.
pub fn is_review_decision(target: ReservationStatus) -> bool {
    match target {
        ReservationStatus::Approved | ReservationStatus::Rejected => true,
        ReservationStatus::Pending | ReservationStatus::Matched => false,
    }
}

/// The opponent set may only be mutated before a match is locked in.
pub fn accepts_opponents(status: ReservationStatus) -> bool {
    match status {
        ReservationStatus::Pending | ReservationStatus::Approved => true,
        ReservationStatus::Rejected | ReservationStatus::Matched => false,
    }
}

/// Finalization (selecting an opponent) requires owner approval first.
pub fn can_finalize(status: ReservationStatus) -> bool {
    match status {
        ReservationStatus::Approved => true,
        ReservationStatus::Pending
        | ReservationStatus::Rejected
        | ReservationStatus::Matched => false,
    }
}
