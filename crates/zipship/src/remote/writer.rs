//! The seam between the upload pipeline and the remote repository service.

use async_trait::async_trait;
use secrecy::SecretString;

use super::error::{AccessError, UploadError};
use super::reference::RepoReference;

/// One file write against the target repository.
#[derive(Debug, Clone)]
pub struct FileWrite<'a> {
    /// Destination path inside the repository.
    pub path: &'a str,
    /// Raw file content; encoded for transport by the implementation.
    pub content: &'a [u8],
    /// Commit message labelling this write.
    pub message: &'a str,
    /// Target branch.
    pub branch: &'a str,
    /// Whether an existing file at this path may be replaced.
    pub overwrite: bool,
}

/// Remote repository operations the pipeline depends on.
///
/// Implemented by [`GithubClient`](super::github::GithubClient) in
/// production and by recording stubs in tests.
#[async_trait]
pub trait RemoteRepo: Send + Sync {
    /// Verifies that the credential/repository pair is usable.
    ///
    /// Parses the URL into a [`RepoReference`] and checks it against the
    /// remote service. Must succeed before any write is attempted.
    async fn validate_access(
        &self,
        credential: &SecretString,
        repo_url: &str,
    ) -> Result<RepoReference, AccessError>;

    /// Looks up an existing file and returns its version token.
    ///
    /// A missing file is `Ok(None)`, not an error.
    async fn find_file(
        &self,
        credential: &SecretString,
        repo: &RepoReference,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, UploadError>;

    /// Commits one file, passing the prior version token when updating an
    /// existing file.
    async fn create_or_update(
        &self,
        credential: &SecretString,
        repo: &RepoReference,
        write: &FileWrite<'_>,
        sha: Option<&str>,
    ) -> Result<(), UploadError>;

    /// Commits one file, performing the existence lookup first when the
    /// write requests an overwrite.
    ///
    /// The captured token makes the remote service treat the write as an
    /// update instead of rejecting it as a conflicting create.
    async fn put_file(
        &self,
        credential: &SecretString,
        repo: &RepoReference,
        write: &FileWrite<'_>,
    ) -> Result<(), UploadError> {
        let sha = if write.overwrite {
            self.find_file(credential, repo, write.path, write.branch)
                .await?
        } else {
            None
        };
        self.create_or_update(credential, repo, write, sha.as_deref())
            .await
    }
}
