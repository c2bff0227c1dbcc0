use clap::Parser;
use neurapress_core::{
    GitHubSettings, PathSettings, WeChatSettings, DEFAULT_BRANCH, DEFAULT_DRAFT_AUTHOR,
    DEFAULT_DRAFT_TITLE, DEFAULT_FALLBACK_SLUG, GITHUB_API_URL, WECHAT_DRAFT_API_URL,
};

/// Configuration for the neurapress-server binary.
///
/// Credentials are optional at startup; operations that need a missing one
/// fail with a configuration error.
#[derive(Parser, Debug, Clone)]
#[command(name = "neurapress-server")]
#[command(about = "Sync edited documents with GitHub and WeChat drafts")]
pub struct Config {
    /// TCP host to bind to
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// TCP port to bind to
    #[arg(long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// GitHub token with contents read/write access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository owner
    #[arg(long, env = "GITHUB_OWNER")]
    pub github_owner: Option<String>,

    /// Repository name
    #[arg(long, env = "GITHUB_REPO")]
    pub github_repo: Option<String>,

    /// Branch used when a request names none
    #[arg(long, default_value = DEFAULT_BRANCH, env = "GITHUB_DEFAULT_BRANCH")]
    pub github_default_branch: String,

    /// GitHub REST API base URL
    #[arg(long, default_value = GITHUB_API_URL, env = "GITHUB_API_URL")]
    pub github_api_url: String,

    /// WeChat official-account access token
    #[arg(long, env = "WECHAT_ACCESS_TOKEN", hide_env_values = true)]
    pub wechat_access_token: Option<String>,

    /// WeChat draft API base URL
    #[arg(long, default_value = WECHAT_DRAFT_API_URL, env = "WECHAT_API_URL")]
    pub wechat_api_url: String,

    /// Title used for drafts saved without one
    #[arg(long, default_value = DEFAULT_DRAFT_TITLE, env = "WECHAT_DEFAULT_TITLE")]
    pub wechat_default_title: String,

    /// Author recorded on drafts
    #[arg(long, default_value = DEFAULT_DRAFT_AUTHOR, env = "WECHAT_DEFAULT_AUTHOR")]
    pub wechat_default_author: String,

    /// Slug for imported articles without a usable title
    #[arg(long, default_value = DEFAULT_FALLBACK_SLUG, env = "IMPORT_FALLBACK_SLUG")]
    pub import_fallback_slug: String,

    /// Outbound HTTP timeout (seconds); unset keeps the client default
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    pub fn github_settings(&self) -> GitHubSettings {
        GitHubSettings {
            token: self.github_token.clone(),
            owner: self.github_owner.clone(),
            repository: self.github_repo.clone(),
            default_branch: self.github_default_branch.clone(),
            api_base_url: self.github_api_url.clone(),
        }
    }

    pub fn wechat_settings(&self) -> WeChatSettings {
        WeChatSettings {
            access_token: self.wechat_access_token.clone(),
            api_base_url: self.wechat_api_url.clone(),
            default_title: self.wechat_default_title.clone(),
            default_author: self.wechat_default_author.clone(),
        }
    }

    pub fn path_settings(&self) -> PathSettings {
        PathSettings {
            fallback_slug: self.import_fallback_slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_map_to_settings() {
        let config = Config::try_parse_from([
            "neurapress-server",
            "--github-token",
            "ghp_x",
            "--github-owner",
            "acme",
            "--github-repo",
            "blog",
            "--github-default-branch",
            "drafts",
            "--wechat-access-token",
            "wx",
            "--import-fallback-slug",
            "imported",
        ])
        .unwrap();

        let github = config.github_settings();
        assert_eq!(github.token.as_deref(), Some("ghp_x"));
        assert_eq!(github.owner.as_deref(), Some("acme"));
        assert_eq!(github.repository.as_deref(), Some("blog"));
        assert_eq!(github.default_branch, "drafts");
        assert!(github.is_configured());

        assert_eq!(config.wechat_settings().access_token.as_deref(), Some("wx"));
        assert_eq!(config.path_settings().fallback_slug, "imported");
    }

    #[test]
    fn test_http_timeout_is_optional() {
        let config = Config::try_parse_from(["neurapress-server", "--http-timeout-secs", "5"]).unwrap();
        assert_eq!(config.http_timeout_secs, Some(5));

        if std::env::var_os("HTTP_TIMEOUT_SECS").is_none() {
            let config = Config::try_parse_from(["neurapress-server"]).unwrap();
            assert_eq!(config.http_timeout_secs, None);
        }
    }
}
