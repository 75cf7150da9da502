use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::admission::{AdmissionError, AdmissionGate};
use super::domain::{ClientMeta, RsvpId, RsvpRecord, RsvpSubmission, RsvpSummary};
use super::guest_list::GuestList;
use super::repository::{RepositoryError, RsvpRepository};

/// Service composing the admission gate and the store. One instance serves
/// all requests; the guest list is immutable and the store synchronizes
/// itself.
pub struct RsvpService<R> {
    gate: AdmissionGate,
    guest_list: Arc<GuestList>,
    repository: Arc<R>,
}

static RSVP_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_rsvp_id() -> RsvpId {
    let id = RSVP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RsvpId(format!("rsvp-{id:06}"))
}

/// Confirmation for an accepted submission. The message greets the matched
/// guest-list entry, not the raw submitted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpReceipt {
    pub rsvp_id: RsvpId,
    pub message: String,
}

/// Operator view: aggregate plus raw rows.
#[derive(Debug, Clone, Serialize)]
pub struct RsvpStatsReport {
    pub summary: RsvpSummary,
    pub rsvps: Vec<RsvpRecord>,
    #[serde(rename = "totalInvited")]
    pub total_invited: usize,
    #[serde(rename = "responseRate")]
    pub response_rate: u32,
}

impl<R> RsvpService<R>
where
    R: RsvpRepository + 'static,
{
    pub fn new(guest_list: Arc<GuestList>, repository: Arc<R>) -> Self {
        Self {
            gate: AdmissionGate::new(guest_list.clone()),
            guest_list,
            repository,
        }
    }

    /// Run the full admission sequence and persist on success. All checks
    /// precede the single insert; no failure path leaves a partial write.
    pub fn submit(
        &self,
        submission: RsvpSubmission,
        client: ClientMeta,
    ) -> Result<RsvpReceipt, AdmissionError> {
        let matched = self.gate.screen_identity(&submission)?;

        let email = submission.email.trim().to_string();
        if self.repository.find_by_email(&email)?.is_some() {
            return Err(AdmissionError::DuplicateSubmission);
        }

        let events = self.gate.screen_events(&submission)?;

        let record = RsvpRecord {
            id: next_rsvp_id(),
            guest_name: submission.guest_name.trim().to_string(),
            email,
            phone: trimmed(submission.phone),
            events,
            dietary_restrictions: trimmed(submission.dietary),
            special_message: trimmed(submission.message),
            created_at: Utc::now(),
            source_ip: client.source_ip,
            user_agent: client.user_agent,
        };

        let rsvp_id = match self.repository.insert(record) {
            Ok(id) => id,
            // The store closes the duplicate race the pre-check leaves open.
            Err(RepositoryError::DuplicateEmail) => {
                return Err(AdmissionError::DuplicateSubmission)
            }
            Err(other) => return Err(AdmissionError::Storage(other)),
        };

        info!(rsvp_id = %rsvp_id.0, guest = %matched, "rsvp accepted");

        Ok(RsvpReceipt {
            rsvp_id,
            message: format!("Thank you, {matched}! Your RSVP has been received."),
        })
    }

    /// Aggregate and raw rows for the operator endpoint. The response rate
    /// is a rounded percentage, zero for an empty guest list.
    pub fn stats(&self) -> Result<RsvpStatsReport, RepositoryError> {
        let summary = self.repository.summary()?;
        let rsvps = self.repository.list_all()?;

        let total_invited = self.guest_list.len();
        let response_rate = if total_invited == 0 {
            0
        } else {
            ((summary.total_rsvps as f64 / total_invited as f64) * 100.0).round() as u32
        };

        Ok(RsvpStatsReport {
            summary,
            rsvps,
            total_invited,
            response_rate,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
