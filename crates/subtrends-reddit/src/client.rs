//! Reddit API client with optional OAuth2 client-credentials auth.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use subtrends_core::config::reddit::RedditConfig;
use subtrends_core::error::{AppError, ErrorKind};
use subtrends_core::result::AppResult;
use subtrends_core::types::{ListingKind, ScrapeBatch, TimeFilter};

use crate::wire::Listing;

/// Slack subtracted from a token's lifetime so it is refreshed before the
/// server actually rejects it.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(60);

/// Response of the `access_token` endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// A cached bearer token.
#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Client for the Reddit listing API.
///
/// With `client_id`/`client_secret` configured, requests carry a bearer
/// token obtained via the client-credentials flow and go to
/// `oauth.reddit.com`. Without credentials the client uses the public
/// `.json` endpoints, which work unauthenticated at a lower rate limit.
#[derive(Debug)]
pub struct RedditClient {
    http: reqwest::Client,
    config: RedditConfig,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    /// Create a client from configuration.
    pub fn new(config: &RedditConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            config: config.clone(),
            token: Mutex::new(None),
        })
    }

    /// Fetch the top listing of a subreddit within a time window.
    pub async fn fetch_top(
        &self,
        subreddit: &str,
        time_filter: TimeFilter,
        limit: u32,
    ) -> AppResult<ScrapeBatch> {
        self.fetch_listing(subreddit, ListingKind::Top, Some(time_filter), limit)
            .await
    }

    /// Fetch the hot listing of a subreddit.
    pub async fn fetch_hot(&self, subreddit: &str, limit: u32) -> AppResult<ScrapeBatch> {
        self.fetch_listing(subreddit, ListingKind::Hot, None, limit)
            .await
    }

    /// Fetch a listing and parse it into a batch.
    async fn fetch_listing(
        &self,
        subreddit: &str,
        listing: ListingKind,
        time_filter: Option<TimeFilter>,
        limit: u32,
    ) -> AppResult<ScrapeBatch> {
        let subreddit = subreddit.trim().trim_start_matches("r/");
        if subreddit.is_empty() {
            return Err(AppError::validation("Subreddit name must not be empty"));
        }
        if limit == 0 {
            return Err(AppError::validation("Limit must be at least 1"));
        }

        let token = self.access_token().await?;
        let base = if token.is_some() {
            &self.config.oauth_base_url
        } else {
            &self.config.public_base_url
        };

        let url = format!("{base}/r/{subreddit}/{listing}.json");
        let mut query: Vec<(&str, String)> = vec![
            ("raw_json", "1".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(filter) = time_filter {
            query.push(("t", filter.as_str().to_string()));
        }

        debug!(%url, subreddit, %listing, limit, "Fetching listing");

        let mut request = self.http.get(&url).query(&query);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                format!("Request to {url} failed"),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, subreddit));
        }

        let envelope: Listing = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Invalid listing response for r/{subreddit}"),
                e,
            )
        })?;

        if envelope.data.children.is_empty() {
            return Err(AppError::validation(format!(
                "No submissions returned for r/{subreddit} ({listing})"
            )));
        }

        let records = envelope
            .data
            .children
            .into_iter()
            .map(|thing| thing.data.into_record())
            .collect::<AppResult<Vec<_>>>()?;

        debug!(subreddit, count = records.len(), "Parsed listing");
        Ok(ScrapeBatch::new(subreddit, listing, time_filter, records))
    }

    /// Return a bearer token, fetching or refreshing it if needed.
    ///
    /// `Ok(None)` means the client runs in anonymous mode.
    async fn access_token(&self) -> AppResult<Option<String>> {
        if !self.config.has_credentials() {
            return Ok(None);
        }

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_valid()
        {
            return Ok(Some(token.access_token.clone()));
        }

        // has_credentials() guarantees both fields are present.
        let client_id = self.config.client_id.as_deref().unwrap_or_default();
        let client_secret = self.config.client_secret.as_deref().unwrap_or_default();

        let url = format!("{}/api/v1/access_token", self.config.auth_base_url);
        debug!(%url, "Requesting access token");

        let response = self
            .http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Token request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::authentication(format!(
                "Token request rejected with status {status}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Invalid token response", e)
        })?;

        let lifetime = Duration::from_secs(token.expires_in)
            .saturating_sub(TOKEN_EXPIRY_SLACK);
        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + lifetime,
        });

        Ok(Some(access_token))
    }

    /// Map a non-success listing status to an error.
    fn status_error(status: StatusCode, subreddit: &str) -> AppError {
        match status {
            StatusCode::NOT_FOUND => {
                AppError::not_found(format!("Subreddit r/{subreddit} does not exist"))
            }
            StatusCode::FORBIDDEN => AppError::authorization(format!(
                "Access to r/{subreddit} is forbidden (private or quarantined)"
            )),
            StatusCode::UNAUTHORIZED => {
                AppError::authentication("Reddit rejected the request credentials")
            }
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::rate_limit("Reddit API rate limit exceeded")
            }
            other => AppError::external_service(format!(
                "Reddit API returned unexpected status {other}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use subtrends_core::types::PostKind;

    fn listing_body() -> &'static str {
        r#"{
            "kind": "Listing",
            "data": {
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "id": "1abc2d",
                            "url": "https://i.redd.it/example.png",
                            "permalink": "/r/rust/comments/1abc2d/example/",
                            "subreddit": "rust",
                            "author": "ferris",
                            "title": "example",
                            "created_utc": 1756393200.0,
                            "post_hint": "image",
                            "score": 42,
                            "num_comments": 7,
                            "upvote_ratio": 0.97
                        }
                    }
                ]
            }
        }"#
    }

    fn anonymous_config(base: &str) -> RedditConfig {
        RedditConfig {
            public_base_url: base.to_string(),
            ..RedditConfig::default()
        }
    }

    #[tokio::test]
    async fn fetches_top_listing_anonymously() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/r/rust/top.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("raw_json".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
                Matcher::UrlEncoded("t".into(), "week".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(listing_body())
            .create_async()
            .await;

        let client = RedditClient::new(&anonymous_config(&server.url())).unwrap();
        let batch = client.fetch_top("rust", TimeFilter::Week, 1).await.unwrap();

        mock.assert_async().await;
        assert_eq!(batch.subreddit, "rust");
        assert_eq!(batch.listing, ListingKind::Top);
        assert_eq!(batch.time_filter, Some(TimeFilter::Week));
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].post_kind, PostKind::SingleImage);
    }

    #[tokio::test]
    async fn hot_listing_has_no_time_filter() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/r/rust/hot.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("raw_json".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
            ]))
            .with_status(200)
            .with_body(listing_body())
            .create_async()
            .await;

        let client = RedditClient::new(&anonymous_config(&server.url())).unwrap();
        let batch = client.fetch_hot("rust", 5).await.unwrap();
        assert_eq!(batch.time_filter, None);
        assert_eq!(batch.object_key().matches("at_point_in_time").count(), 1);
    }

    #[tokio::test]
    async fn authenticated_requests_use_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let token_mock = server
            .mock("POST", "/api/v1/access_token")
            .match_body(Matcher::UrlEncoded(
                "grant_type".into(),
                "client_credentials".into(),
            ))
            .with_status(200)
            .with_body(r#"{"access_token": "sekrit", "token_type": "bearer", "expires_in": 3600}"#)
            .create_async()
            .await;
        let listing_mock = server
            .mock("GET", "/r/rust/hot.json")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer sekrit")
            .with_status(200)
            .with_body(listing_body())
            .expect(2)
            .create_async()
            .await;

        let config = RedditConfig {
            client_id: Some("id".into()),
            client_secret: Some("secret".into()),
            auth_base_url: server.url(),
            oauth_base_url: server.url(),
            ..RedditConfig::default()
        };
        let client = RedditClient::new(&config).unwrap();

        client.fetch_hot("rust", 1).await.unwrap();
        // Second fetch reuses the cached token.
        client.fetch_hot("rust", 1).await.unwrap();

        token_mock.assert_async().await;
        listing_mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_subreddit_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/r/doesnotexist/top.json")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let client = RedditClient::new(&anonymous_config(&server.url())).unwrap();
        let err = client
            .fetch_top("doesnotexist", TimeFilter::Week, 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn empty_listing_is_a_validation_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/r/ghosttown/hot.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "Listing", "data": {"children": []}}"#)
            .create_async()
            .await;

        let client = RedditClient::new(&anonymous_config(&server.url())).unwrap();
        let err = client.fetch_hot("ghosttown", 1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn rejects_empty_subreddit_name() {
        let client = RedditClient::new(&RedditConfig::default()).unwrap();
        let err = client.fetch_hot("  ", 1).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
