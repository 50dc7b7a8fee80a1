//! Thin HTTP-forwarding gateway
//!
//! Front door for the marketplace API: checks request shape (caller header,
//! body fields, date ranges, pagination) before any backend round trip, then
//! forwards the request with `reqwest` and relays the backend's status and
//! body verbatim.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use validator::Validate;

use crate::{
    api::{
        bookings::{ApproveParams, ListParams},
        items::SearchParams,
        requests::PageParams,
        SharerUserId, SHARER_USER_ID,
    },
    error::{AppError, AppResult},
    models::{
        booking::CreateBooking,
        comment::CreateComment,
        item::{CreateItem, UpdateItem},
        request::CreateItemRequest,
        user::{CreateUser, UpdateUser},
    },
};

/// Forwarding client bound to the backend base URL
#[derive(Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Clone)]
pub struct GatewayState {
    pub forward: ForwardClient,
}

impl ForwardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        user_id: Option<i64>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> AppResult<Response> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));

        if let Some(id) = user_id {
            request = request.header(SHARER_USER_ID, id);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Backend unreachable: {}", e)))?;

        relay(response).await
    }

    async fn get(&self, path: &str, user_id: Option<i64>, query: &[(&str, String)]) -> AppResult<Response> {
        self.send::<()>(reqwest::Method::GET, path, user_id, query, None)
            .await
    }

    async fn post<B: Serialize>(&self, path: &str, user_id: Option<i64>, body: &B) -> AppResult<Response> {
        self.send(reqwest::Method::POST, path, user_id, &[], Some(body))
            .await
    }

    async fn patch<B: Serialize>(
        &self,
        path: &str,
        user_id: Option<i64>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> AppResult<Response> {
        self.send(reqwest::Method::PATCH, path, user_id, query, body)
            .await
    }

    async fn delete(&self, path: &str, user_id: Option<i64>) -> AppResult<Response> {
        self.send::<()>(reqwest::Method::DELETE, path, user_id, &[], None)
            .await
    }
}

/// Rebuild the backend response for the caller, status and body untouched
async fn relay(response: reqwest::Response) -> AppResult<Response> {
    let status = StatusCode::from_u16(response.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read backend response: {}", e)))?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Booking dates must be well-formed before the backend sees them
fn validate_booking_dates(booking: &CreateBooking) -> AppResult<()> {
    let now = Local::now().naive_local();
    if booking.start < now {
        return Err(AppError::Validation(
            "Start date must not be in the past".to_string(),
        ));
    }
    if booking.end < now {
        return Err(AppError::Validation(
            "End date must not be in the past".to_string(),
        ));
    }
    if booking.end <= booking.start {
        return Err(AppError::Validation(
            "End date must be strictly after start date".to_string(),
        ));
    }
    Ok(())
}

// Users

async fn create_user(
    State(state): State<GatewayState>,
    Json(user): Json<CreateUser>,
) -> AppResult<Response> {
    validate_body(&user)?;
    state.forward.post("/users", None, &user).await
}

async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Response> {
    validate_body(&update)?;
    state
        .forward
        .patch(&format!("/users/{}", id), None, &[], Some(&update))
        .await
}

async fn get_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.forward.get(&format!("/users/{}", id), None, &[]).await
}

async fn list_users(State(state): State<GatewayState>) -> AppResult<Response> {
    state.forward.get("/users", None, &[]).await
}

async fn delete_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.forward.delete(&format!("/users/{}", id), None).await
}

// Items

async fn create_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(item): Json<CreateItem>,
) -> AppResult<Response> {
    validate_body(&item)?;
    state.forward.post("/items", Some(user_id), &item).await
}

async fn update_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Json(update): Json<UpdateItem>,
) -> AppResult<Response> {
    state
        .forward
        .patch(&format!("/items/{}", id), Some(user_id), &[], Some(&update))
        .await
}

async fn get_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .forward
        .get(&format!("/items/{}", id), Some(user_id), &[])
        .await
}

async fn list_items(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.forward.get("/items", Some(user_id), &[]).await
}

async fn search_items(
    State(state): State<GatewayState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let query = [("text", params.text.unwrap_or_default())];
    state.forward.get("/items/search", None, &query).await
}

async fn add_comment(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(item_id): Path<i64>,
    Json(comment): Json<CreateComment>,
) -> AppResult<Response> {
    validate_body(&comment)?;
    state
        .forward
        .post(&format!("/items/{}/comment", item_id), Some(user_id), &comment)
        .await
}

// Bookings

async fn create_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(booking): Json<CreateBooking>,
) -> AppResult<Response> {
    validate_booking_dates(&booking)?;
    state.forward.post("/bookings", Some(user_id), &booking).await
}

async fn approve_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(params): Query<ApproveParams>,
) -> AppResult<Response> {
    let query = [("approved", params.approved.to_string())];
    state
        .forward
        .patch::<()>(&format!("/bookings/{}", id), Some(user_id), &query, None)
        .await
}

async fn get_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .forward
        .get(&format!("/bookings/{}", id), Some(user_id), &[])
        .await
}

fn listing_query(params: &ListParams) -> AppResult<Vec<(&'static str, String)>> {
    let (state, from, size) = crate::api::bookings::parse_list_params(params)?;
    let state = match state {
        crate::models::booking::BookingState::All => "ALL",
        crate::models::booking::BookingState::Current => "CURRENT",
        crate::models::booking::BookingState::Past => "PAST",
        crate::models::booking::BookingState::Future => "FUTURE",
        crate::models::booking::BookingState::Waiting => "WAITING",
        crate::models::booking::BookingState::Approved => "APPROVED",
        crate::models::booking::BookingState::Rejected => "REJECTED",
    };
    Ok(vec![
        ("state", state.to_string()),
        ("from", from.to_string()),
        ("size", size.to_string()),
    ])
}

async fn list_by_booker(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let query = listing_query(&params)?;
    state.forward.get("/bookings", Some(user_id), &query).await
}

async fn list_by_owner(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    let query = listing_query(&params)?;
    state
        .forward
        .get("/bookings/owner", Some(user_id), &query)
        .await
}

// Item requests

async fn create_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<Response> {
    validate_body(&request)?;
    state.forward.post("/requests", Some(user_id), &request).await
}

async fn get_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .forward
        .get(&format!("/requests/{}", id), Some(user_id), &[])
        .await
}

async fn list_requests(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.forward.get("/requests", Some(user_id), &[]).await
}

async fn list_all_requests(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(params): Query<PageParams>,
) -> AppResult<Response> {
    let (from, size) = crate::api::requests::parse_page_params(&params)?;
    let query = [("from", from.to_string()), ("size", size.to_string())];
    state
        .forward
        .get("/requests/all", Some(user_id), &query)
        .await
}

async fn delete_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state
        .forward
        .delete(&format!("/requests/{}", id), Some(user_id))
        .await
}

/// Create the gateway router mirroring the backend surface
pub fn create_router(state: GatewayState) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id", patch(update_user))
        .route("/users/:id", delete(delete_user))
        .route("/items", post(create_item))
        .route("/items", get(list_items))
        .route("/items/search", get(search_items))
        .route("/items/:id", get(get_item))
        .route("/items/:id", patch(update_item))
        .route("/items/:id/comment", post(add_comment))
        .route("/bookings", post(create_booking))
        .route("/bookings", get(list_by_booker))
        .route("/bookings/owner", get(list_by_owner))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id", patch(approve_booking))
        .route("/requests", post(create_request))
        .route("/requests", get(list_requests))
        .route("/requests/all", get(list_all_requests))
        .route("/requests/:id", get(get_request))
        .route("/requests/:id", delete(delete_request))
        .with_state(state)
}
