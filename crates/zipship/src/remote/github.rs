//! GitHub contents API client.
//!
//! Implements [`RemoteRepo`] over the REST contents endpoints: one GET to
//! validate repository access, one GET per existence lookup, one PUT per
//! file write.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sanitize;

use super::error::{AccessError, UploadError};
use super::reference::RepoReference;
use super::writer::{FileWrite, RemoteRepo};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("zipship/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

/// Maximum length for error bodies quoted back to the caller, to prevent
/// log flooding.
const MAX_ERROR_BODY_LENGTH: usize = 200;

fn truncate_error_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        format!("{}... (truncated)", &body[..MAX_ERROR_BODY_LENGTH])
    } else {
        body.to_string()
    }
}

/// Subset of the contents response used for the existence lookup.
#[derive(Debug, Deserialize)]
struct ContentInfo {
    sha: String,
}

/// Body of the create-or-update PUT.
#[derive(Debug, Serialize)]
struct PutContentsBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

pub struct GithubClient {
    client: Client,
    api_base: Url,
}

impl GithubClient {
    /// Creates a client against the public GitHub API.
    pub fn new() -> Result<Self, AccessError> {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Creates a client against a custom API base URL.
    pub fn with_api_base(api_base: &str) -> Result<Self, AccessError> {
        let api_base = Url::parse(api_base)
            .map_err(|e| AccessError::Remote(format!("invalid API base URL: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(AccessError::Remote(
                "API base URL cannot carry path segments".to_string(),
            ));
        }

        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AccessError::Remote(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_base })
    }

    fn repo_url(&self, repo: &RepoReference) -> Url {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .expect("API base validated at construction")
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.repo.as_str()]);
        url
    }

    fn contents_url(&self, repo: &RepoReference, path: &str) -> Url {
        let mut url = self.repo_url(repo);
        {
            let mut segments = url
                .path_segments_mut()
                .expect("API base validated at construction");
            segments.push("contents");
            segments.extend(path.split('/'));
        }
        url
    }
}

#[async_trait]
impl RemoteRepo for GithubClient {
    async fn validate_access(
        &self,
        credential: &SecretString,
        repo_url: &str,
    ) -> Result<RepoReference, AccessError> {
        let reference = RepoReference::parse(repo_url)?;

        debug!(repo = %sanitize::redact_repo_url(repo_url), "validating repository access");
        let response = self
            .client
            .get(self.repo_url(&reference))
            .bearer_auth(credential.expose_secret())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| AccessError::Remote(format!("access check request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(reference),
            StatusCode::UNAUTHORIZED => Err(AccessError::InvalidCredential),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Err(AccessError::NotFoundOrNoAccess),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AccessError::Remote(format!(
                    "access check failed ({}): {}",
                    status,
                    truncate_error_body(&body)
                )))
            }
        }
    }

    async fn find_file(
        &self,
        credential: &SecretString,
        repo: &RepoReference,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, UploadError> {
        let mut url = self.contents_url(repo, path);
        url.query_pairs_mut().append_pair("ref", branch);

        let response = self
            .client
            .get(url)
            .bearer_auth(credential.expose_secret())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| UploadError::new(path, format!("lookup request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let info: ContentInfo = response.json().await.map_err(|e| {
                    UploadError::new(path, format!("unreadable lookup response: {}", e))
                })?;
                debug!(path, sha = %info.sha, "found existing file");
                Ok(Some(info.sha))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(UploadError::new(
                    path,
                    format!("lookup failed ({}): {}", status, truncate_error_body(&body)),
                ))
            }
        }
    }

    async fn create_or_update(
        &self,
        credential: &SecretString,
        repo: &RepoReference,
        write: &FileWrite<'_>,
        sha: Option<&str>,
    ) -> Result<(), UploadError> {
        let body = PutContentsBody {
            message: write.message,
            content: base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                write.content,
            ),
            branch: write.branch,
            sha,
        };

        let response = self
            .client
            .put(self.contents_url(repo, write.path))
            .bearer_auth(credential.expose_secret())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .json(&body)
            .send()
            .await
            .map_err(|e| UploadError::new(write.path, format!("write request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(path = %write.path, branch = %write.branch, "file written");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(UploadError::new(
                write.path,
                format!("write failed ({}): {}", status, truncate_error_body(&body)),
            ))
        }
    }
}
