//! Booking lifecycle service
//!
//! Owns the booking state machine: creation with availability and
//! authorization checks, the one-shot owner approval transition, and
//! access-controlled retrieval.

use chrono::{Local, NaiveDateTime};

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, BookingStatus, CreateBooking},
    repository::Repository,
};

/// Reject intervals that start or end in the past, or do not end strictly
/// after they start
fn validate_interval(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> AppResult<()> {
    if start < now {
        return Err(AppError::Validation(
            "Start date must not be in the past".to_string(),
        ));
    }
    if end < now {
        return Err(AppError::Validation(
            "End date must not be in the past".to_string(),
        ));
    }
    if end <= start {
        return Err(AppError::Validation(
            "End date must be strictly after start date".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking in WAITING status
    ///
    /// Precondition order: booker exists, item exists, item available,
    /// booker is not the owner, then interval validity.
    pub async fn create(&self, booker_id: i64, booking: CreateBooking) -> AppResult<BookingDetails> {
        self.repository.users.get_by_id(booker_id).await?;

        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if !item.available {
            return Err(AppError::Unavailable(format!(
                "Item with id {} is not available for booking",
                item.id
            )));
        }

        if item.owner_id == booker_id {
            return Err(AppError::AccessDenied(
                "Owner cannot book their own item".to_string(),
            ));
        }

        validate_interval(booking.start, booking.end, Local::now().naive_local())?;

        let created = self.repository.bookings.create(booker_id, &booking).await?;
        tracing::info!(
            booking_id = created.id,
            item_id = item.id,
            booker_id,
            "booking created"
        );
        Ok(created)
    }

    /// Approve or reject a WAITING booking; owner only, one shot
    pub async fn approve(
        &self,
        booking_id: i64,
        acting_user_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_details(booking_id).await?;

        if booking.item.owner_id != acting_user_id {
            return Err(AppError::AccessDenied(
                "Only the item owner may approve or reject a booking".to_string(),
            ));
        }

        if booking.status != BookingStatus::Waiting {
            return Err(AppError::Conflict(
                "Booking has already been processed".to_string(),
            ));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        // The repository transition is guarded on WAITING, so a concurrent
        // approval that got there first turns this into a Conflict.
        let updated = self
            .repository
            .bookings
            .approve_waiting(booking_id, status)
            .await?
            .ok_or_else(|| AppError::Conflict("Booking has already been processed".to_string()))?;

        tracing::info!(booking_id, status = %updated.status, "booking processed");
        Ok(updated)
    }

    /// Get a booking visible to its booker or the item owner; everyone else
    /// gets the same NotFound as a missing booking
    pub async fn get_by_id(&self, booking_id: i64, caller_id: i64) -> AppResult<BookingDetails> {
        self.repository
            .bookings
            .get_details_visible_to(booking_id, caller_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Booking with id {} not found or access denied",
                    booking_id
                ))
            })
    }

    /// List bookings made by a user, newest-starting first
    pub async fn list_by_booker(
        &self,
        booker_id: i64,
        state: BookingState,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(booker_id).await?;
        self.repository
            .bookings
            .list_by_booker(booker_id, state, Local::now().naive_local(), from, size)
            .await
    }

    /// List bookings on items owned by a user, newest-starting first
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        state: BookingState,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(owner_id).await?;
        self.repository
            .bookings
            .list_by_owner(owner_id, state, Local::now().naive_local(), from, size)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    #[test]
    fn interval_in_the_future_is_accepted() {
        let t = now();
        assert!(validate_interval(t + Duration::days(1), t + Duration::days(2), t).is_ok());
    }

    #[test]
    fn start_in_the_past_is_rejected() {
        let t = now();
        let err = validate_interval(t - Duration::days(1), t + Duration::days(1), t).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn end_in_the_past_is_rejected() {
        let t = now();
        let err = validate_interval(t + Duration::days(1), t - Duration::days(1), t).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn equal_start_and_end_are_rejected() {
        let t = now();
        let at = t + Duration::days(1);
        let err = validate_interval(at, at, t).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn inverted_interval_is_rejected() {
        let t = now();
        let err = validate_interval(t + Duration::days(2), t + Duration::days(1), t).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
