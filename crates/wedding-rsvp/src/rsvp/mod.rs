//! RSVP intake: normalization, guest-list matching, admission, storage,
//! and the HTTP endpoints that expose them.

pub mod admission;
pub mod domain;
pub mod guest_list;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use admission::{AdmissionError, AdmissionGate};
pub use domain::{
    ClientMeta, Event, EventReply, EventSummary, RsvpId, RsvpRecord, RsvpSubmission, RsvpSummary,
};
pub use guest_list::{GuestList, GuestListError};
pub use normalizer::normalize_name;
pub use repository::{RepositoryError, RsvpRepository};
pub use router::{rsvp_router, RouterSettings};
pub use service::{RsvpReceipt, RsvpService, RsvpStatsReport};
