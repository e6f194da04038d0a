pub mod archive;
pub mod error;
pub mod jobs;
pub mod remote;
pub mod sanitize;
pub mod upload;

pub use archive::{read_entries, ArchiveEntry, ArchiveError};
pub use error::{Result, ZipshipError};
pub use jobs::{Job, JobParams, JobRegistry, JobStatus, JobUpdate, LogEntry, LogLevel};
pub use remote::{AccessError, FileWrite, GithubClient, RemoteRepo, RepoReference, UploadError};
pub use upload::{ServiceConfig, SubmitRequest, UploadService, ValidationError, MAX_ARCHIVE_BYTES};
