//! Reddit API client configuration.

use serde::{Deserialize, Serialize};

/// Reddit API configuration.
///
/// When both `client_id` and `client_secret` are set, the client
/// authenticates via the OAuth2 client-credentials flow and queries
/// `oauth.reddit.com`. Without credentials it falls back to the public
/// JSON endpoints on `www.reddit.com`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    /// User agent sent with every request. Reddit requires a descriptive
    /// one and throttles generic agents aggressively.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// OAuth2 application client id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth2 application client secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Base URL for listing requests in anonymous mode.
    #[serde(default = "default_public_base")]
    pub public_base_url: String,
    /// Base URL for listing requests in authenticated mode.
    #[serde(default = "default_oauth_base")]
    pub oauth_base_url: String,
    /// Base URL for the token endpoint.
    #[serde(default = "default_auth_base")]
    pub auth_base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl RedditConfig {
    /// Whether OAuth credentials are fully configured.
    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            client_id: None,
            client_secret: None,
            public_base_url: default_public_base(),
            oauth_base_url: default_oauth_base(),
            auth_base_url: default_auth_base(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "subtrends/0.1".to_string()
}

fn default_public_base() -> String {
    "https://www.reddit.com".to_string()
}

fn default_oauth_base() -> String {
    "https://oauth.reddit.com".to_string()
}

fn default_auth_base() -> String {
    "https://www.reddit.com".to_string()
}

fn default_timeout() -> u64 {
    30
}
