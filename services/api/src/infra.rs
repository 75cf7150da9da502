use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use wedding_rsvp::config::RsvpConfig;
use wedding_rsvp::rsvp::{
    GuestList, GuestListError, RepositoryError, RsvpId, RsvpRecord, RsvpRepository, RsvpSummary,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reference store. One mutex covers the whole record list, so the
/// duplicate check and the insert happen under a single lock, the
/// in-memory equivalent of a unique constraint on email.
#[derive(Default)]
pub(crate) struct InMemoryRsvpStore {
    records: Mutex<Vec<RsvpRecord>>,
}

impl RsvpRepository for InMemoryRsvpStore {
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

pub(crate) fn load_guest_list(config: &RsvpConfig) -> Result<GuestList, GuestListError> {
    match &config.guest_list_path {
        Some(path) => GuestList::from_csv_path(path),
        None => Err(GuestListError::MissingSource),
    }
}

/// Stand-in list for the demo and guest-check commands when no CSV is
/// given.
pub(crate) fn sample_guest_list() -> GuestList {
    GuestList::from_names([
        "Jane & John Smith",
        "Alice Johnson",
        "The Patel Family",
        "Omar and Layla Haddad",
    ])
}
