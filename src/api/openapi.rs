//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lendit API",
        version = "0.1.0",
        description = "Item Sharing Marketplace REST API",
        license(name = "MIT")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Items
        items::create_item,
        items::update_item,
        items::get_item,
        items::list_items,
        items::search_items,
        items::add_comment,
        // Bookings
        bookings::create_booking,
        bookings::approve_booking,
        bookings::get_booking,
        bookings::list_by_booker,
        bookings::list_by_owner,
        // Requests
        requests::create_request,
        requests::get_request,
        requests::list_requests,
        requests::list_all_requests,
        requests::delete_request,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Items
            crate::models::item::Item,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItem,
            crate::models::item::ItemDetails,
            // Bookings
            crate::models::booking::BookingStatus,
            crate::models::booking::CreateBooking,
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingShort,
            // Requests
            crate::models::request::ItemRequest,
            crate::models::request::CreateItemRequest,
            crate::models::request::ItemRequestDetails,
            // Comments
            crate::models::comment::CreateComment,
            crate::models::comment::CommentDetails,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User directory"),
        (name = "items", description = "Item catalog and comments"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Item request log")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
