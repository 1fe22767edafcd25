//! X v2 recent-search client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::error::{AnalyzerError, Result};

use super::types::{ApiProblem, SearchResponse};

/// X API v2 base URL.
pub const X_API_BASE: &str = "https://api.twitter.com/2";

/// Environment variable holding the bearer token.
pub const BEARER_TOKEN_ENV_VAR: &str = "X_BEARER_TOKEN";

/// The platform's per-call result ceiling.
pub const MAX_RESULTS_PER_CALL: usize = 100;

/// The smallest page size recent search accepts.
pub const MIN_RESULTS_PER_CALL: usize = 10;

const TWEET_FIELDS: &str = "created_at,public_metrics,author_id,text";
const USER_FIELDS: &str = "username,name,verified";
const EXPANSIONS: &str = "author_id";

/// Longest we will sleep for a rate-limit window to reset.
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);

/// Transport for the recent-search endpoint.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one search call with a fully built query string.
    async fn search_recent(&self, query: &str, max_results: usize) -> Result<SearchResponse>;
}

/// Live client against the X API.
///
/// A 429 response is waited out until the window resets and the request is
/// reissued once, so callers observe a slow call rather than an error.
pub struct XApiClient {
    client: Client,
    bearer_token: String,
    base_url: String,
}

impl XApiClient {
    /// Create a new client.
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            bearer_token: bearer_token.into(),
            base_url: X_API_BASE.to_string(),
        })
    }

    /// Point the client at another base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(&self, query: &str, max_results: usize) -> Result<Response> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/tweets/search/recent", self.base_url))
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", query),
                ("max_results", max_results.as_str()),
                ("tweet.fields", TWEET_FIELDS),
                ("user.fields", USER_FIELDS),
                ("expansions", EXPANSIONS),
            ])
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl SearchClient for XApiClient {
    async fn search_recent(&self, query: &str, max_results: usize) -> Result<SearchResponse> {
        let mut response = self.send(query, max_results).await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let wait = rate_limit_wait(&response);
            tracing::warn!(wait_secs = wait.as_secs(), "Rate limit exceeded, sleeping");
            tokio::time::sleep(wait).await;
            response = self.send(query, max_results).await?;
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiProblem>(&body)
                .ok()
                .and_then(|p| p.message().map(ToString::to_string))
                .unwrap_or(body);
            return Err(AnalyzerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

/// Time until the rate-limit window in `x-rate-limit-reset` reopens.
fn rate_limit_wait(response: &Response) -> Duration {
    response
        .headers()
        .get("x-rate-limit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .map_or(Duration::from_secs(1), |reset| wait_until(reset, Utc::now().timestamp()))
}

/// Seconds from `now` until `reset` (both epoch seconds), plus one second of
/// slack, capped at the longest window the platform uses.
fn wait_until(reset: i64, now: i64) -> Duration {
    let secs = reset.saturating_sub(now).max(0).unsigned_abs().saturating_add(1);
    Duration::from_secs(secs).min(MAX_RATE_LIMIT_WAIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_wait_until() {
        assert_eq!(wait_until(110, 100), Duration::from_secs(11));
        assert_eq!(wait_until(90, 100), Duration::from_secs(1));
        assert_eq!(wait_until(100_000, 0), MAX_RATE_LIMIT_WAIT);
        assert_eq!(wait_until(i64::MAX, -1), MAX_RATE_LIMIT_WAIT);
        assert_eq!(wait_until(i64::MIN, 1), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_search_sends_fields_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tweets/search/recent"))
            .and(bearer_token("token"))
            .and(query_param("query", "rust -is:retweet lang:en"))
            .and(query_param("max_results", "25"))
            .and(query_param("expansions", "author_id"))
            .and(query_param("user.fields", "username,name,verified"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{
                    "id": "1",
                    "text": "hello",
                    "created_at": "2025-02-15T10:30:00.000Z",
                    "author_id": "9",
                    "public_metrics": {"retweet_count": 1, "reply_count": 2, "like_count": 3, "quote_count": 0}
                }],
                "includes": {"users": [{"id": "9", "name": "Nine", "username": "nine", "verified": true}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = XApiClient::new("token").unwrap().with_base_url(server.uri());
        let response = client
            .search_recent("rust -is:retweet lang:en", 25)
            .await
            .unwrap();

        assert_eq!(response.data.unwrap().len(), 1);
        assert_eq!(response.includes.unwrap().users[0].username, "nine");
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "title": "Unauthorized",
                "detail": "Unauthorized",
                "status": 401
            })))
            .mount(&server)
            .await;

        let client = XApiClient::new("bad").unwrap().with_base_url(server.uri());
        let err = client.search_recent("q", 10).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_rate_limited_request_is_reissued_once() {
        let server = MockServer::start().await;
        let reset = Utc::now().timestamp() - 5;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429).insert_header("x-rate-limit-reset", reset.to_string()),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"result_count": 0}
            })))
            .mount(&server)
            .await;

        let client = XApiClient::new("token").unwrap().with_base_url(server.uri());
        let response = client.search_recent("q", 10).await.unwrap();
        assert!(response.data.is_none());
    }
}
