use super::domain::{RsvpId, RsvpRecord, RsvpSummary};

/// Storage surface the admission flow and the operator view need. The
/// backing engine is out of scope here; implementations range from the
/// in-memory reference store to a relational table.
pub trait RsvpRepository: Send + Sync {
    /// Exact-email lookup backing the duplicate pre-check.
    fn find_by_email(&self, email: &str) -> Result<Option<RsvpRecord>, RepositoryError>;

    /// Persist a new record. Implementations must reject a duplicate email
    /// themselves (unique constraint or equivalent); the gate's pre-check
    /// alone leaves a window between check and write.
    fn insert(&self, record: RsvpRecord) -> Result<RsvpId, RepositoryError>;

    /// All records, newest first.
    fn list_all(&self) -> Result<Vec<RsvpRecord>, RepositoryError>;

    /// Aggregate counts for the operator view.
    fn summary(&self) -> Result<RsvpSummary, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("an RSVP already exists for this email")]
    DuplicateEmail,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
