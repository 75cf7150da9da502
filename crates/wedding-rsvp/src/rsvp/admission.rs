use std::collections::BTreeMap;
use std::sync::Arc;

use super::domain::{Event, EventReply, RsvpSubmission};
use super::guest_list::GuestList;
use super::repository::RepositoryError;

/// Why a submission was refused. The validation variants carry the exact
/// text shown to the guest; `Storage` is operator-facing only.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("Name and email are required")]
    MissingField { field: &'static str },
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("We couldn't find \"{name}\" on our guest list. Please check the spelling or contact us if you believe this is an error.")]
    NotInvited { name: String },
    #[error("An RSVP has already been submitted with this email address. Please contact us if you need to make changes.")]
    DuplicateSubmission,
    #[error("Please select your attendance for at least one event.")]
    NoEventSelected,
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl AdmissionError {
    /// Form field the error points at, echoed in 4xx response bodies.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AdmissionError::MissingField { field } => Some(field),
            AdmissionError::InvalidEmail | AdmissionError::DuplicateSubmission => Some("email"),
            AdmissionError::NotInvited { .. } => Some("guestName"),
            AdmissionError::NoEventSelected => Some("events"),
            AdmissionError::Storage(_) => None,
        }
    }
}

/// The pure half of the admission decision: every check that does not
/// consult the store. The service interleaves the duplicate lookup between
/// `screen_identity` and `screen_events` so error precedence stays
/// required fields → email shape → guest list → duplicate → events.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    guest_list: Arc<GuestList>,
}

impl AdmissionGate {
    pub fn new(guest_list: Arc<GuestList>) -> Self {
        Self { guest_list }
    }

    pub fn guest_list(&self) -> &GuestList {
        &self.guest_list
    }

    /// Required fields, email shape, and the guest-list match. Returns the
    /// matched guest-list entry, which the confirmation text greets.
    pub fn screen_identity(&self, submission: &RsvpSubmission) -> Result<String, AdmissionError> {
        let guest_name = submission.guest_name.trim();
        if guest_name.is_empty() {
            return Err(AdmissionError::MissingField { field: "guestName" });
        }

        let email = submission.email.trim();
        if email.is_empty() {
            return Err(AdmissionError::MissingField { field: "email" });
        }
        if !is_valid_email(email) {
            return Err(AdmissionError::InvalidEmail);
        }

        match self.guest_list.lookup(guest_name) {
            Some(entry) => Ok(entry.to_string()),
            None => Err(AdmissionError::NotInvited {
                name: guest_name.to_string(),
            }),
        }
    }

    /// At least one attending event. Returns the parsed replies for the
    /// record to persist.
    pub fn screen_events(
        &self,
        submission: &RsvpSubmission,
    ) -> Result<BTreeMap<Event, EventReply>, AdmissionError> {
        let replies = submission.event_replies();
        if replies.values().any(|reply| reply.attending) {
            Ok(replies)
        } else {
            Err(AdmissionError::NoEventSelected)
        }
    }
}

/// Shape check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`, a
/// non-empty local part, a dotted domain, no whitespace anywhere.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    matches!(domain.rsplit_once('.'), Some((host, tld)) if !host.is_empty() && !tld.is_empty())
}
