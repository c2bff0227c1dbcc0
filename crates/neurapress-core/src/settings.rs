//! Explicit settings records for the sync clients.
//!
//! Credentials are optional here and validated per call, so a missing token
//! fails the operation that needs it without any network traffic.

use crate::error::{IntegrationError, Result};
use crate::model::RepoTarget;

pub const DEFAULT_BRANCH: &str = "main";
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const WECHAT_DRAFT_API_URL: &str = "https://api.weixin.qq.com/cgi-bin/draft";
pub const DEFAULT_DRAFT_TITLE: &str = "NeuraPress Draft";
pub const DEFAULT_DRAFT_AUTHOR: &str = "NeuraPress";
pub const DEFAULT_FALLBACK_SLUG: &str = "wechat-article";

/// Treat empty strings as unset.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Settings for the GitHub contents client.
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub token: Option<String>,
    pub owner: Option<String>,
    pub repository: Option<String>,
    /// Branch used when a request names none.
    pub default_branch: String,
    pub api_base_url: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            token: None,
            owner: None,
            repository: None,
            default_branch: DEFAULT_BRANCH.to_string(),
            api_base_url: GITHUB_API_URL.to_string(),
        }
    }
}

impl GitHubSettings {
    pub fn token(&self) -> Result<&str> {
        non_empty(self.token.as_deref()).ok_or_else(|| {
            IntegrationError::missing_config("GITHUB_TOKEN_MISSING", "Missing GitHub token")
        })
    }

    /// Resolve the repository target, letting per-request overrides win.
    pub fn target(&self, owner: Option<&str>, repository: Option<&str>) -> Result<RepoTarget> {
        let owner = non_empty(owner).or(non_empty(self.owner.as_deref()));
        let repository = non_empty(repository).or(non_empty(self.repository.as_deref()));
        match (owner, repository) {
            (Some(owner), Some(repository)) => Ok(RepoTarget {
                owner: owner.to_string(),
                repository: repository.to_string(),
            }),
            _ => Err(IntegrationError::missing_config(
                "GITHUB_REPO_MISSING",
                "Missing GitHub repo config",
            )),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token().is_ok() && self.target(None, None).is_ok()
    }

    /// The requested branch, or the default one.
    pub fn branch_or_default<'a>(&'a self, branch: Option<&'a str>) -> &'a str {
        non_empty(branch).unwrap_or(&self.default_branch)
    }
}

/// Settings for the WeChat draft client.
#[derive(Debug, Clone)]
pub struct WeChatSettings {
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub default_title: String,
    pub default_author: String,
}

impl Default for WeChatSettings {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base_url: WECHAT_DRAFT_API_URL.to_string(),
            default_title: DEFAULT_DRAFT_TITLE.to_string(),
            default_author: DEFAULT_DRAFT_AUTHOR.to_string(),
        }
    }
}

impl WeChatSettings {
    pub fn access_token(&self) -> Result<&str> {
        non_empty(self.access_token.as_deref()).ok_or_else(|| {
            IntegrationError::missing_config(
                "WECHAT_TOKEN_MISSING",
                "Missing WeChat access token",
            )
        })
    }

    pub fn is_configured(&self) -> bool {
        self.access_token().is_ok()
    }
}

/// Settings for import path derivation.
#[derive(Debug, Clone)]
pub struct PathSettings {
    pub fallback_slug: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            fallback_slug: DEFAULT_FALLBACK_SLUG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token() {
        let settings = GitHubSettings {
            token: Some("  ".to_string()),
            ..Default::default()
        };
        let err = settings.token().unwrap_err();
        assert_eq!(err.code(), Some("GITHUB_TOKEN_MISSING"));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_target_overrides() {
        let settings = GitHubSettings {
            owner: Some("acme".to_string()),
            repository: Some("blog".to_string()),
            ..Default::default()
        };
        assert_eq!(
            settings.target(None, None).unwrap(),
            RepoTarget {
                owner: "acme".to_string(),
                repository: "blog".to_string(),
            }
        );
        assert_eq!(
            settings.target(Some("other"), Some("")).unwrap(),
            RepoTarget {
                owner: "other".to_string(),
                repository: "blog".to_string(),
            }
        );

        let err = GitHubSettings::default().target(Some("acme"), None).unwrap_err();
        assert_eq!(err.code(), Some("GITHUB_REPO_MISSING"));
    }

    #[test]
    fn test_branch_default() {
        let settings = GitHubSettings::default();
        assert_eq!(settings.branch_or_default(None), "main");
        assert_eq!(settings.branch_or_default(Some("")), "main");
        assert_eq!(settings.branch_or_default(Some("drafts")), "drafts");
    }

    #[test]
    fn test_wechat_token() {
        assert_eq!(
            WeChatSettings::default().access_token().unwrap_err().code(),
            Some("WECHAT_TOKEN_MISSING")
        );
        let settings = WeChatSettings {
            access_token: Some("tok".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.access_token().unwrap(), "tok");
        assert!(settings.is_configured());
    }
}
