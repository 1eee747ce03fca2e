//! Collaborator error types.

/// A directory or approval-queue call failed.
///
/// No retries are attempted here; the caller decides.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{service}: record not found")]
    NotFound { service: &'static str },

    #[error("{service}: record already exists")]
    Conflict { service: &'static str },

    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    pub(crate) const DIRECTORY: &'static str = "user directory";
    pub(crate) const APPROVALS: &'static str = "approval queue";
}
