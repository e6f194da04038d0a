//! Submission payload and pre-job validation errors.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::jobs::JobParams;

/// Rejections raised before any job record exists.
///
/// These surface synchronously to the submitter; everything that happens
/// after job creation surfaces only through the job record.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("archive of {size} bytes exceeds the {max} byte limit")]
    ArchiveTooLarge { size: usize, max: usize },

    #[error("unsupported content type '{0}', expected a zip archive")]
    UnsupportedContentType(String),

    #[error("archive payload is empty")]
    EmptyArchive,

    #[error("credential must not be empty")]
    MissingCredential,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_true() -> bool {
    true
}

/// An upload submission as the transport layer hands it over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Credential used against the remote service. Held on the job record
    /// but never echoed back.
    pub credential: String,
    /// Target repository URL, `.../<owner>/<repo>[.git]`.
    pub repo_url: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Commit message labelling each write; a per-file default is generated
    /// when blank.
    #[serde(default)]
    pub commit_message: Option<String>,
    /// Keep the archive's directory layout (basenames only when false).
    #[serde(default = "default_true")]
    pub preserve_structure: bool,
    /// Replace files that already exist at the target branch.
    #[serde(default)]
    pub overwrite: bool,
}

impl SubmitRequest {
    /// Converts the submission into the write-only parameters a job carries.
    pub fn into_params(self) -> JobParams {
        JobParams {
            credential: SecretString::from(self.credential),
            repo_url: self.repo_url,
            branch: self.branch,
            commit_message: self.commit_message,
            preserve_structure: self.preserve_structure,
            overwrite: self.overwrite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_applies_defaults() {
        let request: SubmitRequest = serde_json::from_str(
            r#"{"credential": "tok", "repoUrl": "https://github.com/acme/site"}"#,
        )
        .unwrap();

        assert_eq!(request.branch, "main");
        assert!(request.commit_message.is_none());
        assert!(request.preserve_structure);
        assert!(!request.overwrite);
    }

    #[test]
    fn test_deserialize_explicit_fields() {
        let request: SubmitRequest = serde_json::from_str(
            r#"{
                "credential": "tok",
                "repoUrl": "https://github.com/acme/site",
                "branch": "release",
                "commitMessage": "Sync assets",
                "preserveStructure": false,
                "overwrite": true
            }"#,
        )
        .unwrap();

        assert_eq!(request.branch, "release");
        assert_eq!(request.commit_message.as_deref(), Some("Sync assets"));
        assert!(!request.preserve_structure);
        assert!(request.overwrite);
    }

    #[test]
    fn test_into_params_carries_all_fields() {
        let request: SubmitRequest = serde_json::from_str(
            r#"{"credential": "tok", "repoUrl": "https://github.com/acme/site", "overwrite": true}"#,
        )
        .unwrap();

        let params = request.into_params();
        assert_eq!(params.repo_url, "https://github.com/acme/site");
        assert_eq!(params.branch, "main");
        assert!(params.overwrite);
    }
}
