//! Helpers for keeping submitted credentials out of log lines and errors.

/// Strips userinfo/tokens from a repository URL.
///
/// - `https://ghp_token@github.com/user/repo` → `https://****@github.com/user/repo`
/// - `https://github.com/user/repo` → `https://github.com/user/repo` (no change)
pub fn redact_repo_url(url: &str) -> String {
    if let Some(scheme_end) = url.find("://") {
        let after_scheme = &url[scheme_end + 3..];
        if let Some(at_pos) = after_scheme.find('@') {
            let scheme = &url[..scheme_end + 3];
            let after_at = &after_scheme[at_pos + 1..];
            return format!("{}****@{}", scheme, after_at);
        }
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_with_token() {
        assert_eq!(
            redact_repo_url("https://ghp_abc123@github.com/user/repo"),
            "https://****@github.com/user/repo"
        );
    }

    #[test]
    fn test_redact_url_without_token_is_unchanged() {
        assert_eq!(
            redact_repo_url("https://github.com/user/repo"),
            "https://github.com/user/repo"
        );
    }

    #[test]
    fn test_redact_plain_string_is_unchanged() {
        assert_eq!(redact_repo_url("not a url"), "not a url");
    }
}
