//! Remote repository error types.

use thiserror::Error;

/// Pre-flight failures: these abort a job before any write is attempted.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The submitted URL does not match the `<owner>/<repo>` shape.
    #[error("repository URL does not match the expected '<owner>/<repo>' shape: {0}")]
    InvalidReference(String),

    /// The remote service rejected the credential.
    #[error("credential rejected by the remote service")]
    InvalidCredential,

    /// The repository does not exist, or the credential cannot see it.
    #[error("repository not found or credential has no access")]
    NotFoundOrNoAccess,

    /// Any other remote failure, carrying the underlying message.
    #[error("remote service error: {0}")]
    Remote(String),
}

/// A failed write for one destination path.
///
/// Scoped to a single file: the orchestrator records it and moves on to the
/// next entry instead of aborting the job.
#[derive(Error, Debug)]
#[error("upload failed for '{path}': {message}")]
pub struct UploadError {
    pub path: String,
    pub message: String,
}

impl UploadError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
