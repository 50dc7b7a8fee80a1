//! Item catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentDetails, CreateComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
    },
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct SearchParams {
    pub text: Option<String>,
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Owner or request not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(item): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    item.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.items.add_item(user_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update an item; only the owner may
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 403, description = "Caller is not the owner"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(update): Json<UpdateItem>,
) -> AppResult<Json<Item>> {
    let updated = state.services.items.update_item(id, user_id, update).await?;
    Ok(Json(updated))
}

/// Get item details with comments; booking projections for the owner
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = ItemDetails),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemDetails>> {
    let item = state.services.items.get_item(id, user_id).await?;
    Ok(Json(item))
}

/// List the caller's items with booking projections and comments
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "Caller's items", body = Vec<ItemDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemDetails>>> {
    let items = state.services.items.items_of_user(user_id).await?;
    Ok(Json(items))
}

/// Search available items by name or description substring
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        ("text" = Option<String>, Query, description = "Search text; blank yields an empty list")
    ),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Item>>> {
    let items = state
        .services
        .items
        .search(params.text.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(items))
}

/// Comment on an item after a completed booking
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID")
    ),
    request_body = CreateComment,
    responses(
        (status = 201, description = "Comment created", body = CommentDetails),
        (status = 400, description = "No completed approved booking on this item"),
        (status = 404, description = "User or item not found")
    )
)]
pub async fn add_comment(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<CommentDetails>)> {
    comment
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .comments
        .add_comment(user_id, item_id, comment)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
