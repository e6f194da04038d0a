//! Submission facade: job creation, background hand-off, and read paths.

use std::fmt::Write as _;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use secrecy::SecretString;
use tracing::{debug, error};

use crate::jobs::{Job, JobRegistry, JobStatus, JobUpdate, LogEntry};
use crate::remote::{AccessError, RemoteRepo, RepoReference};

use super::config::ServiceConfig;
use super::orchestrator;
use super::request::{SubmitRequest, ValidationError};

/// Owns the registry and the remote client for one running process.
///
/// Constructed once at startup and handed to the transport layer; there is
/// no implicit global state.
pub struct UploadService {
    registry: Arc<JobRegistry>,
    remote: Arc<dyn RemoteRepo>,
    config: ServiceConfig,
}

impl UploadService {
    pub fn new(
        registry: Arc<JobRegistry>,
        remote: Arc<dyn RemoteRepo>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            registry,
            remote,
            config,
        }
    }

    /// The registry this service mutates, for callers that expose raw reads.
    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// Validates the submission, creates the job record, and hands the run
    /// off to a background task.
    ///
    /// Returns the generated job identifier immediately; the run reports
    /// everything else through the job record.
    pub fn submit(
        &self,
        request: SubmitRequest,
        archive_bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ValidationError> {
        validate_submission(&self.config, &request, &archive_bytes, content_type)?;

        let job = self.registry.create(request.into_params());
        let job_id = job.job_id.clone();
        debug!(job_id = %job_id, bytes = archive_bytes.len(), "upload job accepted");

        let registry = Arc::clone(&self.registry);
        let remote = Arc::clone(&self.remote);
        let id = job_id.clone();
        tokio::spawn(async move {
            let run = AssertUnwindSafe(orchestrator::run(
                Arc::clone(&registry),
                remote,
                id.clone(),
                archive_bytes,
            ))
            .catch_unwind();

            if let Err(panic) = run.await {
                let message = panic_message(panic);
                error!(job_id = %id, error = %message, "upload task panicked");
                registry.update(
                    &id,
                    JobUpdate {
                        status: Some(JobStatus::Failed),
                        error: Some(message.clone()),
                        append_logs: vec![LogEntry::error(message)],
                        ..Default::default()
                    },
                );
            }
        });

        Ok(job_id)
    }

    /// Verifies a credential/repository pair without starting an upload.
    pub async fn preflight(
        &self,
        credential: &str,
        repo_url: &str,
    ) -> Result<RepoReference, AccessError> {
        let credential = SecretString::from(credential.to_string());
        self.remote.validate_access(&credential, repo_url).await
    }

    /// Snapshot of one job.
    pub fn job(&self, job_id: &str) -> Option<Job> {
        self.registry.get(job_id)
    }

    /// All jobs, newest first.
    pub fn jobs(&self) -> Vec<Job> {
        self.registry.list_all()
    }

    /// Job counts by status: (pending, processing, completed, failed).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        self.registry.counts()
    }

    /// Renders a job's log trail as plain text, one line per entry.
    pub fn export_logs(&self, job_id: &str) -> Option<String> {
        let job = self.registry.get(job_id)?;
        let mut output = String::new();
        for entry in &job.logs {
            // Writing to a String cannot fail, so the Result is discarded
            let _ = writeln!(
                output,
                "{} [{}] {}",
                entry.timestamp.to_rfc3339(),
                entry.level,
                entry.message
            );
        }
        Some(output)
    }
}

fn validate_submission(
    config: &ServiceConfig,
    request: &SubmitRequest,
    archive_bytes: &[u8],
    content_type: &str,
) -> Result<(), ValidationError> {
    if request.credential.trim().is_empty() {
        return Err(ValidationError::MissingCredential);
    }

    // Ignore content-type parameters such as "; charset=..."
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if !config
        .allowed_content_types
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    {
        return Err(ValidationError::UnsupportedContentType(
            content_type.to_string(),
        ));
    }

    if archive_bytes.is_empty() {
        return Err(ValidationError::EmptyArchive);
    }
    if archive_bytes.len() > config.max_archive_bytes {
        return Err(ValidationError::ArchiveTooLarge {
            size: archive_bytes.len(),
            max: config.max_archive_bytes,
        });
    }

    Ok(())
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure in upload task".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitRequest {
        SubmitRequest {
            credential: "token".to_string(),
            repo_url: "https://github.com/acme/site".to_string(),
            branch: "main".to_string(),
            commit_message: None,
            preserve_structure: true,
            overwrite: false,
        }
    }

    #[test]
    fn test_validation_accepts_zip_submission() {
        let config = ServiceConfig::default();
        let result = validate_submission(&config, &request(), b"PK...", "application/zip");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_ignores_content_type_parameters() {
        let config = ServiceConfig::default();
        let result = validate_submission(
            &config,
            &request(),
            b"PK...",
            "Application/ZIP; boundary=xyz",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_validation_rejects_wrong_content_type() {
        let config = ServiceConfig::default();
        let result = validate_submission(&config, &request(), b"PK...", "text/plain");
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedContentType(_))
        ));
    }

    #[test]
    fn test_validation_rejects_oversized_archive() {
        let config = ServiceConfig {
            max_archive_bytes: 4,
            ..Default::default()
        };
        let result = validate_submission(&config, &request(), b"12345", "application/zip");
        assert!(matches!(
            result,
            Err(ValidationError::ArchiveTooLarge { size: 5, max: 4 })
        ));
    }

    #[test]
    fn test_validation_rejects_empty_payload_and_credential() {
        let config = ServiceConfig::default();

        let result = validate_submission(&config, &request(), b"", "application/zip");
        assert!(matches!(result, Err(ValidationError::EmptyArchive)));

        let mut blank = request();
        blank.credential = "   ".to_string();
        let result = validate_submission(&config, &blank, b"PK...", "application/zip");
        assert!(matches!(result, Err(ValidationError::MissingCredential)));
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new("boom".to_string())), "boom");
        assert_eq!(
            panic_message(Box::new(42_u32)),
            "unexpected failure in upload task"
        );
    }
}
