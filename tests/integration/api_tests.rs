//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`

use chrono::{Duration, Local};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:9090";
const USER_HEADER: &str = "X-Sharer-User-Id";

/// Unique email per test run to dodge the uniqueness constraint
fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}{}@lendit.test", prefix, nanos)
}

async fn create_user(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": name, "email": unique_email(name) }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No user ID")
}

async fn create_item(client: &Client, owner_id: i64, name: &str, available: bool) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, owner_id)
        .json(&json!({
            "name": name,
            "description": format!("{} for sharing", name),
            "available": available
        }))
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("No item ID")
}

fn iso(dt: chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_probes_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_conflicts() {
    let client = Client::new();
    let email = unique_email("dup");

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "First", "email": email }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 201);

    // Same address, different case
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "name": "Second", "email": email.to_uppercase() }))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let stranger = create_user(&client, "stranger").await;
    let item = create_item(&client, owner, "Drill", true).await;

    let now = Local::now().naive_local();

    // Renter books for tomorrow..the day after
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, renter)
        .json(&json!({
            "item_id": item,
            "start": iso(now + Duration::days(1)),
            "end": iso(now + Duration::days(2))
        }))
        .send()
        .await
        .expect("Failed to create booking");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse booking");
    let booking_id = body["id"].as_i64().expect("No booking ID");
    assert_eq!(body["status"], "WAITING");
    assert_eq!(body["booker"]["id"].as_i64(), Some(renter));
    assert_eq!(body["item"]["id"].as_i64(), Some(item));

    // Owner approves
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to approve booking");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(body["status"], "APPROVED");

    // A second approval attempt conflicts, whichever way it goes
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", BASE_URL, booking_id))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to send second approval");
    assert_eq!(response.status(), 409);

    // Renter can fetch the booking
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, renter)
        .send()
        .await
        .expect("Failed to fetch booking");
    assert_eq!(response.status(), 200);

    // A third party sees NotFound, not Forbidden
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, booking_id))
        .header(USER_HEADER, stranger)
        .send()
        .await
        .expect("Failed to fetch booking");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_booking_with_start_in_past_is_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let item = create_item(&client, owner, "Ladder", true).await;

    let now = Local::now().naive_local();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, renter)
        .json(&json!({
            "item_id": item,
            "start": iso(now - Duration::days(1)),
            "end": iso(now + Duration::days(1))
        }))
        .send()
        .await
        .expect("Failed to send booking");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_booking_with_equal_dates_is_rejected() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let item = create_item(&client, owner, "Tent", true).await;

    let at = Local::now().naive_local() + Duration::days(1);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, renter)
        .json(&json!({ "item_id": item, "start": iso(at), "end": iso(at) }))
        .send()
        .await
        .expect("Failed to send booking");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let item = create_item(&client, owner, "Bike", true).await;

    let now = Local::now().naive_local();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, owner)
        .json(&json!({
            "item_id": item,
            "start": iso(now + Duration::days(1)),
            "end": iso(now + Duration::days(2))
        }))
        .send()
        .await
        .expect("Failed to send booking");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_unavailable_item_cannot_be_booked() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let item = create_item(&client, owner, "Saw", false).await;

    let now = Local::now().naive_local();

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .header(USER_HEADER, renter)
        .json(&json!({
            "item_id": item,
            "start": iso(now + Duration::days(1)),
            "end": iso(now + Duration::days(2))
        }))
        .send()
        .await
        .expect("Failed to send booking");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_missing_caller_header_is_bad_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/bookings", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_state_filter_is_bad_request() {
    let client = Client::new();
    let user = create_user(&client, "lister").await;

    let response = client
        .get(format!("{}/bookings?state=SOMEDAY", BASE_URL))
        .header(USER_HEADER, user)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_listing_filters_and_ordering() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let item = create_item(&client, owner, "Canoe", true).await;

    let now = Local::now().naive_local();

    // Two future bookings with different starts
    for days in [3, 1] {
        let response = client
            .post(format!("{}/bookings", BASE_URL))
            .header(USER_HEADER, renter)
            .json(&json!({
                "item_id": item,
                "start": iso(now + Duration::days(days)),
                "end": iso(now + Duration::days(days) + Duration::hours(6))
            }))
            .send()
            .await
            .expect("Failed to create booking");
        assert_eq!(response.status(), 201);
    }

    // FUTURE filter sees both, newest-starting first
    let response = client
        .get(format!("{}/bookings?state=FUTURE", BASE_URL))
        .header(USER_HEADER, renter)
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    let bookings = body.as_array().expect("Not an array");
    assert!(bookings.len() >= 2);
    let starts: Vec<&str> = bookings
        .iter()
        .map(|b| b["start"].as_str().expect("No start"))
        .collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(starts, sorted);

    // WAITING filter from the owner's perspective
    let response = client
        .get(format!("{}/bookings/owner?state=WAITING", BASE_URL))
        .header(USER_HEADER, owner)
        .send()
        .await
        .expect("Failed to list owner bookings");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    for booking in body.as_array().expect("Not an array") {
        assert_eq!(booking["status"], "WAITING");
    }

    // PAST filter excludes the future bookings
    let response = client
        .get(format!("{}/bookings?state=PAST", BASE_URL))
        .header(USER_HEADER, renter)
        .send()
        .await
        .expect("Failed to list bookings");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    for booking in body.as_array().expect("Not an array") {
        assert!(booking["end"].as_str().expect("No end") < iso(now).as_str());
    }
}

#[tokio::test]
#[ignore]
async fn test_comment_requires_completed_booking() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let renter = create_user(&client, "renter").await;
    let item = create_item(&client, owner, "Projector", true).await;

    // No booking at all yet
    let response = client
        .post(format!("{}/items/{}/comment", BASE_URL, item))
        .header(USER_HEADER, renter)
        .json(&json!({ "text": "Worked great" }))
        .send()
        .await
        .expect("Failed to send comment");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_item_update_is_owner_only() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let other = create_user(&client, "other").await;
    let item = create_item(&client, owner, "Mixer", true).await;

    let response = client
        .patch(format!("{}/items/{}", BASE_URL, item))
        .header(USER_HEADER, other)
        .json(&json!({ "name": "Stolen mixer" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_search_blank_text_yields_empty_list() {
    let client = Client::new();

    let response = client
        .get(format!("{}/items/search?text=", BASE_URL))
        .send()
        .await
        .expect("Failed to search");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().expect("Not an array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_search_treats_percent_literally() {
    let client = Client::new();
    let owner = create_user(&client, "owner").await;
    let marked = create_item(&client, owner, "Banner 100% cotton", true).await;
    let plain = create_item(&client, owner, "Banner plain", true).await;

    let response = client
        .get(format!("{}/items/search?text=100%25", BASE_URL))
        .send()
        .await
        .expect("Failed to search");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    let ids: Vec<i64> = body
        .as_array()
        .expect("Not an array")
        .iter()
        .map(|i| i["id"].as_i64().expect("No item ID"))
        .collect();
    assert!(ids.contains(&marked));
    assert!(!ids.contains(&plain));
}

#[tokio::test]
#[ignore]
async fn test_item_request_flow() {
    let client = Client::new();
    let requestor = create_user(&client, "requestor").await;
    let fulfiller = create_user(&client, "fulfiller").await;

    // Post a request
    let response = client
        .post(format!("{}/requests", BASE_URL))
        .header(USER_HEADER, requestor)
        .json(&json!({ "description": "Looking for a telescope" }))
        .send()
        .await
        .expect("Failed to create request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse request");
    let request_id = body["id"].as_i64().expect("No request ID");

    // Another user lists an item fulfilling it
    let response = client
        .post(format!("{}/items", BASE_URL))
        .header(USER_HEADER, fulfiller)
        .json(&json!({
            "name": "Telescope",
            "description": "8-inch reflector",
            "available": true,
            "request_id": request_id
        }))
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), 201);

    // The request detail now lists the item
    let response = client
        .get(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_HEADER, requestor)
        .send()
        .await
        .expect("Failed to fetch request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse request");
    let items = body["items"].as_array().expect("No items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Telescope");

    // The requestor's own listing carries the request with its items
    let response = client
        .get(format!("{}/requests", BASE_URL))
        .header(USER_HEADER, requestor)
        .send()
        .await
        .expect("Failed to list own requests");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    let own = body
        .as_array()
        .expect("Not an array")
        .iter()
        .find(|r| r["id"].as_i64() == Some(request_id))
        .expect("Own request missing from listing");
    assert_eq!(own["items"].as_array().expect("No items array").len(), 1);

    // Other users see it under /requests/all; the requestor does not
    let response = client
        .get(format!("{}/requests/all?from=0&size=50", BASE_URL))
        .header(USER_HEADER, fulfiller)
        .send()
        .await
        .expect("Failed to list all requests");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    assert!(body
        .as_array()
        .expect("Not an array")
        .iter()
        .any(|r| r["id"].as_i64() == Some(request_id)));

    let response = client
        .get(format!("{}/requests/all?from=0&size=50", BASE_URL))
        .header(USER_HEADER, requestor)
        .send()
        .await
        .expect("Failed to list all requests");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse list");
    assert!(!body
        .as_array()
        .expect("Not an array")
        .iter()
        .any(|r| r["id"].as_i64() == Some(request_id)));

    // Pagination bounds are enforced
    let response = client
        .get(format!("{}/requests/all?size=0", BASE_URL))
        .header(USER_HEADER, fulfiller)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Only the requestor may delete it
    let response = client
        .delete(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_HEADER, fulfiller)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/requests/{}", BASE_URL, request_id))
        .header(USER_HEADER, requestor)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 204);
}
