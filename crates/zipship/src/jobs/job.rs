//! Job records: the state a polling client reads.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

/// Lifecycle state of an upload job.
///
/// Moves only forward: `Pending → Processing → {Completed | Failed}`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Returns true if this job is finished (completed or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Severity of a job log entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// One line of a job's diagnostic trail. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

/// Submission parameters a job carries for its run.
///
/// Write-only: held on the record for the orchestrator but never serialized
/// back to observers.
#[derive(Debug, Clone)]
pub struct JobParams {
    pub credential: SecretString,
    pub repo_url: String,
    pub branch: String,
    pub commit_message: Option<String>,
    pub preserve_structure: bool,
    pub overwrite: bool,
}

/// One archive-to-repository synchronization run and its tracked state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique job identifier.
    pub job_id: String,
    /// Submission parameters (credential included) — never serialized.
    #[serde(skip_serializing)]
    pub params: JobParams,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Integer percentage of entries started, 0–100.
    pub progress: u8,
    /// Path of the entry currently being handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    /// Entries handed to the remote writer so far.
    pub files_processed: usize,
    /// Total entries found in the archive.
    pub total_files: usize,
    /// Append-only diagnostic trail, in submission order.
    pub logs: Vec<LogEntry>,
    /// Terminal error message (set when failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was submitted.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Creates a fresh pending job with its initial log entry.
    pub fn new(params: JobParams) -> Self {
        let now = Utc::now();
        Self {
            job_id: uuid::Uuid::new_v4().to_string(),
            params,
            status: JobStatus::Pending,
            progress: 0,
            current_file: None,
            files_processed: 0,
            total_files: 0,
            logs: vec![LogEntry::info("Upload job created")],
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges a partial update into the record.
    ///
    /// Scalar fields are set only when supplied; `append_logs` is
    /// concatenated onto the existing trail, never replacing it. The
    /// `updated_at` timestamp is refreshed on every call.
    pub fn apply_update(&mut self, update: JobUpdate) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(current_file) = update.current_file {
            self.current_file = Some(current_file);
        }
        if let Some(files_processed) = update.files_processed {
            self.files_processed = files_processed;
        }
        if let Some(total_files) = update.total_files {
            self.total_files = total_files;
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        self.logs.extend(update.append_logs);
        self.updated_at = Utc::now();
    }

    /// Returns true if this job is finished (completed or failed).
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A typed partial update merged by the registry.
///
/// `append_logs` is an explicit tail: the registry concatenates it onto the
/// stored log so concurrent appenders cannot truncate each other's entries.
#[derive(Debug, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub current_file: Option<String>,
    pub files_processed: Option<usize>,
    pub total_files: Option<usize>,
    pub error: Option<String>,
    pub append_logs: Vec<LogEntry>,
}
