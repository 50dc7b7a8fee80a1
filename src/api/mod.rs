//! API handlers for Lendit REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the numeric caller id. Trusted, unauthenticated input.
pub const SHARER_USER_ID: &str = "X-Sharer-User-Id";

/// Extractor for the caller identity header
///
/// A missing or malformed header is an input validation failure (400),
/// applied uniformly across all endpoints that require it.
pub struct SharerUserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_USER_ID)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing {} header", SHARER_USER_ID))
            })?;

        let user_id = value.trim().parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("Invalid {} header: {}", SHARER_USER_ID, value))
        })?;

        Ok(SharerUserId(user_id))
    }
}
