//! Booking model, status state machine and listing filters

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::item::Item;
use super::user::User;

/// Booking approval status
///
/// WAITING is the only non-terminal status: a booking transitions exactly
/// once, by the item owner, to APPROVED or REJECTED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status")]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Waiting => write!(f, "WAITING"),
            BookingStatus::Approved => write!(f, "APPROVED"),
            BookingStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Listing filter for booking queries
///
/// CURRENT, PAST and FUTURE partition bookings by their temporal relation to
/// "now", regardless of status. WAITING, APPROVED and REJECTED filter by
/// exact status, regardless of timing. ALL applies neither filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Approved,
    Rejected,
}

impl FromStr for BookingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "APPROVED" => Ok(BookingState::Approved),
            "REJECTED" => Ok(BookingState::Rejected),
            other => Err(format!("Unknown state: {}", other)),
        }
    }
}

/// Create booking request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub item_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Booking with resolved item and booker projections for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDetails {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub booker: User,
    pub item: Item,
}

/// Short booking projection shown on item detail views
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("ALL".parse::<BookingState>().unwrap(), BookingState::All);
        assert_eq!("current".parse::<BookingState>().unwrap(), BookingState::Current);
        assert_eq!("Past".parse::<BookingState>().unwrap(), BookingState::Past);
        assert_eq!("FUTURE".parse::<BookingState>().unwrap(), BookingState::Future);
        assert_eq!("waiting".parse::<BookingState>().unwrap(), BookingState::Waiting);
        assert_eq!("APPROVED".parse::<BookingState>().unwrap(), BookingState::Approved);
        assert_eq!("rejected".parse::<BookingState>().unwrap(), BookingState::Rejected);
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!("UNKNOWN".parse::<BookingState>().is_err());
        assert!("".parse::<BookingState>().is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Waiting).unwrap(),
            "\"WAITING\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Approved).unwrap(),
            "\"APPROVED\""
        );
        assert_eq!(
            serde_json::to_string(&BookingStatus::Rejected).unwrap(),
            "\"REJECTED\""
        );
    }
}
