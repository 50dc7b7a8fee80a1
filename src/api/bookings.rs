//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, CreateBooking},
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct ApproveParams {
    pub approved: bool,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Resolve the state filter and pagination window, defaulting to
/// state=ALL, from=0, size=10
pub(crate) fn parse_list_params(params: &ListParams) -> AppResult<(BookingState, i64, i64)> {
    let state = match params.state.as_deref() {
        None => BookingState::All,
        Some(s) => s.parse().map_err(AppError::BadRequest)?,
    };

    let from = params.from.unwrap_or(0);
    if from < 0 {
        return Err(AppError::BadRequest("from must be >= 0".to_string()));
    }

    let size = params.size.unwrap_or(10);
    if size <= 0 {
        return Err(AppError::BadRequest("size must be > 0".to_string()));
    }

    Ok((state, from, size))
}

/// Create a booking request for an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingDetails),
        (status = 400, description = "Invalid dates or item unavailable"),
        (status = 403, description = "Owner cannot book own item"),
        (status = 404, description = "Booker or item not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let created = state.services.bookings.create(user_id, booking).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve or reject a waiting booking; item owner only
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("approved" = bool, Query, description = "true to approve, false to reject")
    ),
    responses(
        (status = 200, description = "Booking processed", body = BookingDetails),
        (status = 403, description = "Caller is not the item owner"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking already processed")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(params): Query<ApproveParams>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .approve(id, user_id, params.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking; visible only to the booker or the item owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found or caller has no access")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_by_id(id, user_id).await?;
    Ok(Json(booking))
}

/// List the caller's bookings as renter, filtered and newest-starting first
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING, APPROVED or REJECTED"),
        ("from" = Option<i64>, Query, description = "Offset, >= 0"),
        ("size" = Option<i64>, Query, description = "Page size, > 0")
    ),
    responses(
        (status = 200, description = "Bookings made by the caller", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_by_booker(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let (filter, from, size) = parse_list_params(&params)?;
    let bookings = state
        .services
        .bookings
        .list_by_booker(user_id, filter, from, size)
        .await?;
    Ok(Json(bookings))
}

/// List bookings on the caller's items, filtered and newest-starting first
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        ("state" = Option<String>, Query, description = "ALL, CURRENT, PAST, FUTURE, WAITING, APPROVED or REJECTED"),
        ("from" = Option<i64>, Query, description = "Offset, >= 0"),
        ("size" = Option<i64>, Query, description = "Page size, > 0")
    ),
    responses(
        (status = 200, description = "Bookings on the caller's items", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state or invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_by_owner(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let (filter, from, size) = parse_list_params(&params)?;
    let bookings = state
        .services
        .bookings
        .list_by_owner(user_id, filter, from, size)
        .await?;
    Ok(Json(bookings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(state: Option<&str>, from: Option<i64>, size: Option<i64>) -> ListParams {
        ListParams {
            state: state.map(String::from),
            from,
            size,
        }
    }

    #[test]
    fn defaults_applied_when_absent() {
        let (state, from, size) = parse_list_params(&params(None, None, None)).unwrap();
        assert_eq!(state, BookingState::All);
        assert_eq!(from, 0);
        assert_eq!(size, 10);
    }

    #[test]
    fn unknown_state_is_a_bad_request() {
        let err = parse_list_params(&params(Some("SOMEDAY"), None, None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn negative_from_is_a_bad_request() {
        let err = parse_list_params(&params(None, Some(-1), None)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn zero_size_is_a_bad_request() {
        let err = parse_list_params(&params(None, None, Some(0))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
