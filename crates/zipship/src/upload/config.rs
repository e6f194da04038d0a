//! Service-level limits.

/// Archives above this size are rejected before a job is created.
pub const MAX_ARCHIVE_BYTES: usize = 100 * 1024 * 1024;

/// Submission limits the service enforces ahead of job creation.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_archive_bytes: usize,
    /// Content types accepted for the archive payload.
    pub allowed_content_types: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_archive_bytes: MAX_ARCHIVE_BYTES,
            allowed_content_types: vec![
                "application/zip".to_string(),
                "application/x-zip-compressed".to_string(),
            ],
        }
    }
}
