use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use wedding_rsvp::rsvp::{
    rsvp_router, GuestList, RepositoryError, RouterSettings, RsvpId, RsvpRecord, RsvpRepository,
    RsvpService, RsvpSummary,
};

#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<RsvpRecord>>,
}

impl RsvpRepository for MemoryStore {
    fn find_by_email(&self, email: &str) -> Result<Option<RsvpRecord>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| record.email == email).cloned())
    }

    fn insert(&self, record: RsvpRecord) -> Result<RsvpId, RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.iter().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::DuplicateEmail);
        }
        let id = record.id.clone();
        guard.push(record);
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<RsvpRecord>, RepositoryError> {
        let mut records = self.records.lock().expect("store mutex poisoned").clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn summary(&self) -> Result<RsvpSummary, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(RsvpSummary::from_records(guard.iter()))
    }
}

fn app() -> axum::Router {
    let guest_list = Arc::new(GuestList::from_names(["Jane & John Smith", "Alice Johnson"]));
    let service = Arc::new(RsvpService::new(guest_list, Arc::new(MemoryStore::default())));
    rsvp_router(
        service,
        RouterSettings {
            operator_token: "operator-secret".to_string(),
            access_phrase: Some("open-sesame".to_string()),
            session_ttl: chrono::Duration::hours(24),
            expose_storage_errors: false,
        },
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json payload")
    };
    (status, value)
}

fn rsvp_payload(email: &str) -> Value {
    json!({
        "guestName": "John Smith",
        "email": email,
        "phone": "555-0100",
        "ceremony-attending": "yes",
        "ceremony-guests": "2",
        "reception-attending": "yes",
        "dietary": "vegetarian",
        "message": "Can't wait!"
    })
}

#[tokio::test]
async fn full_rsvp_journey() {
    let app = app();

    // Unlock the soft gate and re-validate the issued session token.
    let (status, body) = send(
        &app,
        post_json("/validate-access", json!({ "passphrase": "open-sesame" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token issued").to_string();

    let (status, body) = send(&app, post_json("/validate-access", json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));

    // Submit an RSVP for an invited guest.
    let (status, body) = send(&app, post_json("/submit-rsvp", rsvp_payload("john@example.com"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("Jane & John Smith"));

    // A second submission with the same email is a conflict.
    let (status, body) = send(&app, post_json("/submit-rsvp", rsvp_payload("john@example.com"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["field"], json!("email"));

    // Stats are gated behind the operator token.
    let (status, body) = send(
        &app,
        Request::get("/rsvp-stats")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("rsvps").is_none());

    let (status, body) = send(
        &app,
        Request::get("/rsvp-stats")
            .header(header::AUTHORIZATION, "Bearer operator-secret")
            .body(Body::empty())
            .expect("request builds"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total_rsvps"], json!(1));
    assert_eq!(body["totalInvited"], json!(2));
    assert_eq!(body["responseRate"], json!(50));
    assert_eq!(body["rsvps"][0]["guest_name"], json!("John Smith"));
    assert_eq!(
        body["rsvps"][0]["events"]["ceremony"],
        json!({ "attending": true, "guests": 2 })
    );
}
