mod common;

use axum::http::StatusCode;
use common::{FailingStore, ForgetfulStore, TestApp};
use serde_json::{json, Value};
use std::sync::Arc;

fn sample_booking() -> Value {
    json!({
        "customerName": "Rohan Mehta",
        "packageDetails": { "name": "Gold", "price": 24999, "durationHours": 4 },
        "themes": ["Superheroes", "Space"],
        "addons": [{ "name": "Magician", "price": 3500 }],
        "totalAmount": 28499,
        "status": "Pending"
    })
}

async fn create_booking(app: &TestApp) -> Value {
    let (status, body) = app.post("/api/bookings", sample_booking()).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_booking_preserves_nested_fields() {
    let app = TestApp::spawn();

    let body = create_booking(&app).await;

    assert_eq!(body["packageDetails"]["name"], "Gold");
    assert_eq!(body["themes"], json!(["Superheroes", "Space"]));
    assert_eq!(body["addons"][0]["price"], 3500);
    assert_eq!(body["totalAmount"], 28499);
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn booking_round_trip() {
    let app = TestApp::spawn();
    let created = create_booking(&app).await;
    let id = created["_id"].as_str().unwrap();

    let (status, fetched) = app.get(&format!("/api/bookings/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, list) = app.get("/api/bookings").await;
    assert_eq!(list, json!([created]));
}

#[tokio::test]
async fn update_booking_merges_fields() {
    let app = TestApp::spawn();
    let created = create_booking(&app).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/bookings/{}", id),
            json!({ "status": "Confirmed", "themes": ["Jungle"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Confirmed");
    assert_eq!(body["themes"], json!(["Jungle"]));
    assert_eq!(body["customerName"], "Rohan Mehta");
    assert_eq!(body["packageDetails"], created["packageDetails"]);
    assert_eq!(body["createdAt"], created["createdAt"]);
    // isResolved is an enquiry-only rule
    assert!(body.get("isResolved").is_none());
}

#[tokio::test]
async fn update_booking_strips_identifier() {
    let app = TestApp::spawn();
    let created = create_booking(&app).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/bookings/{}", id),
            json!({ "_id": "65f1a2b3c4d5e6f708192a3b", "status": "Cancelled" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], id);
    assert_eq!(body["status"], "Cancelled");
}

#[tokio::test]
async fn get_unknown_booking_is_not_found() {
    let app = TestApp::spawn();

    let (status, body) = app.get("/api/bookings/65f1a2b3c4d5e6f708192a3b").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Booking not found" }));
}

#[tokio::test]
async fn malformed_booking_ids_are_bad_requests() {
    let app = TestApp::spawn();

    let (get_status, get_body) = app.get("/api/bookings/not-an-id").await;
    let (put_status, put_body) = app
        .put("/api/bookings/not-an-id", json!({ "status": "Confirmed" }))
        .await;
    let (delete_status, delete_body) = app.delete("/api/bookings/not-an-id").await;

    for (status, body) in [
        (get_status, get_body),
        (put_status, put_body),
        (delete_status, delete_body),
    ] {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid booking ID format" }));
    }
}

#[tokio::test]
async fn delete_booking_is_not_repeatable() {
    let app = TestApp::spawn();
    let created = create_booking(&app).await;
    let uri = format!("/api/bookings/{}", created["_id"].as_str().unwrap());

    let (first, body) = app.delete(&uri).await;
    let (second, _) = app.delete(&uri).await;
    let (third, _) = app.delete(&uri).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(body["message"], "Booking deleted successfully");
    assert_eq!(second, StatusCode::NOT_FOUND);
    assert_eq!(third, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_object_body_is_rejected() {
    let app = TestApp::spawn();

    let (status, body) = app.post("/api/bookings", json!(["not", "an", "object"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    let (_, list) = app.get("/api/bookings").await;
    assert_eq!(list, json!([]));
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let app = TestApp::with_store(Arc::new(FailingStore));

    let (status, body) = app.get("/api/bookings").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "Failed to fetch bookings",
            "details": "store offline",
            "errorType": "StoreUnavailable"
        })
    );

    let (status, body) = app
        .put(
            "/api/bookings/65f1a2b3c4d5e6f708192a3b",
            json!({ "status": "Confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to update booking");

    let (status, body) = app.post("/api/enquiries", json!({ "name": "X" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create enquiry");
}

#[tokio::test]
async fn malformed_id_is_rejected_before_the_store() {
    let app = TestApp::with_store(Arc::new(FailingStore));

    let (status, _) = app.delete("/api/bookings/xyz").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreadable_created_booking_is_a_server_error() {
    let app = TestApp::with_store(Arc::new(ForgetfulStore::default()));

    let (status, body) = app.post("/api/bookings", sample_booking()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["details"], "Failed to create booking");
}
