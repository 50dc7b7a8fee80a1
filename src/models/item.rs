//! Item (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::booking::BookingShort;
use super::comment::CommentDetails;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    /// Item request this item was created in fulfillment of, if any
    pub request_id: Option<i64>,
}

/// Create item request
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

/// Partial item update; absent or blank fields are left unchanged
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Item detail view with comments, and booking projections for the owner
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    /// Most recent approved booking that has already started; owner view only
    pub last_booking: Option<BookingShort>,
    /// Nearest approved future booking; owner view only
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<CommentDetails>,
}
