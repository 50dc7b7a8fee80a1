//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateItemRequest, ItemRequest, ItemRequestDetails},
};

use super::SharerUserId;

#[derive(Deserialize)]
pub struct PageParams {
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// Resolve the pagination window, defaulting to from=0, size=10
pub(crate) fn parse_page_params(params: &PageParams) -> AppResult<(i64, i64)> {
    let from = params.from.unwrap_or(0);
    if from < 0 {
        return Err(AppError::BadRequest("from must be >= 0".to_string()));
    }

    let size = params.size.unwrap_or(10);
    if size <= 0 {
        return Err(AppError::BadRequest("size must be > 0".to_string()));
    }

    Ok((from, size))
}

/// Post a request for an item not yet in the catalog
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Request created", body = ItemRequest),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemRequest>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.requests.add_request(user_id, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a request with the items created in fulfillment of it
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 200, description = "Request details", body = ItemRequestDetails),
        (status = 404, description = "User or request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestDetails>> {
    let request = state.services.requests.get_request(id, user_id).await?;
    Ok(Json(request))
}

/// List the caller's own requests, newest first, with fulfilling items
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    responses(
        (status = 200, description = "The caller's item requests", body = Vec<ItemRequestDetails>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// List other users' requests, newest first, paginated
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        ("from" = Option<i64>, Query, description = "Offset, >= 0"),
        ("size" = Option<i64>, Query, description = "Page size, > 0")
    ),
    responses(
        (status = 200, description = "Other users' item requests", body = Vec<ItemRequestDetails>),
        (status = 400, description = "Invalid pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_all_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ItemRequestDetails>>> {
    let (from, size) = parse_page_params(&params)?;
    let requests = state
        .services
        .requests
        .list_others(user_id, from, size)
        .await?;
    Ok(Json(requests))
}

/// Delete an item request; only its requestor may
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID")
    ),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found or not owned by the caller")
    )
)]
pub async fn delete_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.requests.delete_request(id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_applied_when_absent() {
        let (from, size) = parse_page_params(&PageParams { from: None, size: None }).unwrap();
        assert_eq!(from, 0);
        assert_eq!(size, 10);
    }

    #[test]
    fn negative_from_is_a_bad_request() {
        let err = parse_page_params(&PageParams {
            from: Some(-1),
            size: None,
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn zero_size_is_a_bad_request() {
        let err = parse_page_params(&PageParams {
            from: None,
            size: Some(0),
        })
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
