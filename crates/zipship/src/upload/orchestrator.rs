//! The upload state machine: one run per submitted job.
//!
//! A run owns every mutation of its job record. Pre-flight failures (corrupt
//! archive, unusable credential) abort before any write; a failed write for
//! one file is recorded and skipped so the rest of the batch still lands.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};

use crate::archive::{self, ArchiveError};
use crate::jobs::{JobRegistry, JobStatus, JobUpdate, LogEntry};
use crate::remote::{AccessError, FileWrite, RemoteRepo};

#[derive(Error, Debug)]
enum RunError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("job record missing from the registry")]
    UnknownJob,
}

/// Drives one job from `pending` to a terminal state.
///
/// Every failure escaping the per-file loop lands on the job record as its
/// terminal error; nothing propagates back to the submitter.
pub async fn run(
    registry: Arc<JobRegistry>,
    remote: Arc<dyn RemoteRepo>,
    job_id: String,
    archive_bytes: Vec<u8>,
) {
    let span = info_span!("upload_job", job_id = %job_id);
    let outcome = run_steps(&registry, remote.as_ref(), &job_id, &archive_bytes)
        .instrument(span)
        .await;

    if let Err(e) = outcome {
        let message = e.to_string();
        error!(job_id = %job_id, error = %message, "upload job failed");
        registry.update(
            &job_id,
            JobUpdate {
                status: Some(JobStatus::Failed),
                error: Some(message.clone()),
                append_logs: vec![LogEntry::error(message)],
                ..Default::default()
            },
        );
    }
}

async fn run_steps(
    registry: &JobRegistry,
    remote: &dyn RemoteRepo,
    job_id: &str,
    archive_bytes: &[u8],
) -> Result<(), RunError> {
    let job = registry.get(job_id).ok_or(RunError::UnknownJob)?;
    let params = job.params;

    // Step 1: announce the run
    registry.update(
        job_id,
        JobUpdate {
            status: Some(JobStatus::Processing),
            append_logs: vec![LogEntry::info("Extracting archive contents")],
            ..Default::default()
        },
    );

    // Step 2: decode the archive before touching the remote at all
    let entries = archive::read_entries(archive_bytes)?;

    // Step 3: the entry count becomes the denominator for progress
    let total = entries.len();
    registry.update(
        job_id,
        JobUpdate {
            total_files: Some(total),
            append_logs: vec![LogEntry::info(format!("Archive contains {} files", total))],
            ..Default::default()
        },
    );

    // Step 4: pre-flight; a doomed run must not leave partial commits behind
    let reference = remote
        .validate_access(&params.credential, &params.repo_url)
        .await?;
    info!(repo = %reference, "repository access validated");

    // Step 5: sequential per-entry writes, isolating each file's failure
    for (index, entry) in entries.iter().enumerate() {
        let destination = if params.preserve_structure {
            entry.path.clone()
        } else {
            entry.file_name().to_string()
        };
        let progress = if total == 0 {
            0
        } else {
            (index * 100 / total) as u8
        };
        registry.update(
            job_id,
            JobUpdate {
                current_file: Some(destination.clone()),
                files_processed: Some(index),
                progress: Some(progress),
                ..Default::default()
            },
        );

        let message = commit_message(params.commit_message.as_deref(), &destination);
        let write = FileWrite {
            path: &destination,
            content: &entry.content,
            message: &message,
            branch: &params.branch,
            overwrite: params.overwrite,
        };

        match remote.put_file(&params.credential, &reference, &write).await {
            Ok(()) => {
                registry.update(
                    job_id,
                    JobUpdate {
                        append_logs: vec![LogEntry::info(format!("Uploaded {}", destination))],
                        ..Default::default()
                    },
                );
            }
            Err(e) => {
                warn!(path = %destination, error = %e, "file upload failed, continuing");
                registry.update(
                    job_id,
                    JobUpdate {
                        append_logs: vec![LogEntry::error(format!(
                            "Failed to upload {}: {}",
                            destination, e.message
                        ))],
                        ..Default::default()
                    },
                );
            }
        }
    }

    // Step 6: finalize
    registry.update(
        job_id,
        JobUpdate {
            status: Some(JobStatus::Completed),
            progress: Some(100),
            files_processed: Some(total),
            append_logs: vec![LogEntry::info(format!(
                "Upload finished: {} files processed",
                total
            ))],
            ..Default::default()
        },
    );

    Ok(())
}

/// The job's template, or a per-file default when the template is blank.
fn commit_message(template: Option<&str>, destination: &str) -> String {
    match template {
        Some(template) if !template.trim().is_empty() => template.to_string(),
        _ => format!("Upload {}", destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_message_uses_template() {
        assert_eq!(
            commit_message(Some("Sync content"), "a.txt"),
            "Sync content"
        );
    }

    #[test]
    fn test_commit_message_falls_back_when_blank() {
        assert_eq!(commit_message(None, "a.txt"), "Upload a.txt");
        assert_eq!(commit_message(Some(""), "a.txt"), "Upload a.txt");
        assert_eq!(commit_message(Some("   "), "docs/b.md"), "Upload docs/b.md");
    }
}
