use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::rsvp::domain::{ClientMeta, RsvpId, RsvpRecord, RsvpSubmission, RsvpSummary};
use crate::rsvp::guest_list::GuestList;
use crate::rsvp::repository::{RepositoryError, RsvpRepository};
use crate::rsvp::router::{rsvp_router, RouterSettings};
use crate::rsvp::service::RsvpService;

pub(super) fn guest_list() -> GuestList {
    GuestList::from_names(["Jane & John Smith", "Alice Johnson", "The Patel Family"])
}

pub(super) fn submission() -> RsvpSubmission {
    RsvpSubmission {
        guest_name: "John Smith".to_string(),
        email: "john@example.com".to_string(),
        phone: Some("555-0100".to_string()),
        ceremony_attending: Some("yes".to_string()),
        ceremony_guests: Some("2".to_string()),
        reception_attending: Some("no".to_string()),
        dietary: Some("vegetarian".to_string()),
        message: Some("See you there!".to_string()),
        ..RsvpSubmission::default()
    }
}

pub(super) fn client() -> ClientMeta {
    ClientMeta {
        source_ip: "203.0.113.7".to_string(),
        user_agent: "test-agent".to_string(),
    }
}

pub(super) fn build_service() -> (RsvpService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = RsvpService::new(Arc::new(guest_list()), store.clone());
    (service, store)
}

pub(super) fn settings() -> RouterSettings {
    RouterSettings {
        operator_token: "operator-secret".to_string(),
        access_phrase: Some("open-sesame".to_string()),
        session_ttl: chrono::Duration::hours(24),
        expose_storage_errors: false,
    }
}

pub(super) fn router_with(service: RsvpService<MemoryStore>) -> axum::Router {
    rsvp_router(Arc::new(service), settings())
}

#[derive(Default)]
pub(super) struct MemoryStore {
    records: Mutex<Vec<RsvpRecord>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<RsvpRecord> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
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
        let mut records = self.records();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn summary(&self) -> Result<RsvpSummary, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(RsvpSummary::from_records(guard.iter()))
    }
}

pub(super) struct OfflineStore;

impl RsvpRepository for OfflineStore {
    fn find_by_email(&self, _email: &str) -> Result<Option<RsvpRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: RsvpRecord) -> Result<RsvpId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<RsvpRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn summary(&self) -> Result<RsvpSummary, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
