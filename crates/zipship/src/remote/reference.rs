//! Repository URL parsing.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::sanitize;

use super::error::AccessError;

static REPO_URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn repo_url_pattern() -> &'static Regex {
    REPO_URL_PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?[^/\s]+(?:/[^/\s]+)*/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$",
        )
        .expect("hard-coded pattern compiles")
    })
}

/// A validated (owner, repository) pair parsed from a submitted URL.
///
/// Exists only for the duration of one orchestrator run or pre-flight call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoReference {
    pub owner: String,
    pub repo: String,
}

impl RepoReference {
    /// Parses `.../<owner>/<repo>[.git]`, stripping any `.git` suffix.
    ///
    /// The URL must carry at least a host ahead of the owner/repo pair;
    /// anything else fails with [`AccessError::InvalidReference`]. The
    /// rejected URL is redacted before it lands in the error message.
    pub fn parse(url: &str) -> Result<Self, AccessError> {
        let trimmed = url.trim();
        let captures = repo_url_pattern().captures(trimmed).ok_or_else(|| {
            AccessError::InvalidReference(sanitize::redact_repo_url(trimmed))
        })?;

        Ok(Self {
            owner: captures[1].to_string(),
            repo: captures[2].to_string(),
        })
    }
}

impl std::fmt::Display for RepoReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let reference = RepoReference::parse("https://github.com/acme/site").unwrap();
        assert_eq!(reference.owner, "acme");
        assert_eq!(reference.repo, "site");
    }

    #[test]
    fn test_parse_strips_git_suffix_and_trailing_slash() {
        let reference = RepoReference::parse("https://github.com/acme/site.git").unwrap();
        assert_eq!(reference.repo, "site");

        let reference = RepoReference::parse("https://github.com/acme/site/").unwrap();
        assert_eq!(reference.repo, "site");
    }

    #[test]
    fn test_parse_without_scheme() {
        let reference = RepoReference::parse("github.com/acme/site").unwrap();
        assert_eq!(reference.owner, "acme");
        assert_eq!(reference.repo, "site");
    }

    #[test]
    fn test_parse_rejects_bare_owner_repo() {
        assert!(matches!(
            RepoReference::parse("acme/site"),
            Err(AccessError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_repo() {
        assert!(matches!(
            RepoReference::parse("https://github.com/acme"),
            Err(AccessError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_parse_rejects_ssh_form() {
        assert!(matches!(
            RepoReference::parse("git@github.com:acme/site.git"),
            Err(AccessError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RepoReference::parse("not a url at all").is_err());
        assert!(RepoReference::parse("").is_err());
    }

    #[test]
    fn test_invalid_reference_error_redacts_token() {
        let err = RepoReference::parse("https://ghp_secret@github.com/acme").unwrap_err();
        let message = err.to_string();
        assert!(!message.contains("ghp_secret"));
        assert!(message.contains("****@github.com"));
    }

    #[test]
    fn test_display_is_owner_slash_repo() {
        let reference = RepoReference::parse("https://github.com/acme/site").unwrap();
        assert_eq!(reference.to_string(), "acme/site");
    }
}
