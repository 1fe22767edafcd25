//! Keyword search over X, normalized into [`RawPost`]s.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

use super::client::{SearchClient, MAX_RESULTS_PER_CALL, MIN_RESULTS_PER_CALL};
use super::types::{ApiUser, RawPost, SearchResponse, UNKNOWN_AUTHOR};

/// Searches recent posts for a keyword.
pub struct PostFetcher {
    client: Arc<dyn SearchClient>,
}

impl PostFetcher {
    /// Create a fetcher over a search transport.
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    /// Build the search query: the keyword without reposts, English only.
    #[must_use]
    pub fn build_query(keyword: &str) -> String {
        format!("{keyword} -is:retweet lang:en")
    }

    /// Search for up to `min(max_results, 100)` posts in a single call.
    ///
    /// Recent search rejects page sizes below 10, so smaller requests ask
    /// for 10 and keep the first `max_results`.
    pub async fn try_search(&self, keyword: &str, max_results: usize) -> Result<Vec<RawPost>> {
        let limit = max_results.min(MAX_RESULTS_PER_CALL);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query = Self::build_query(keyword);
        let page_size = limit.max(MIN_RESULTS_PER_CALL);
        tracing::debug!(query = %query, page_size, "Searching recent posts");

        let response = self.client.search_recent(&query, page_size).await?;
        let mut posts = normalize(response);
        posts.truncate(limit);

        if posts.is_empty() {
            println!("No tweets found for keyword: {keyword}");
        }
        tracing::info!(count = posts.len(), keyword, "Fetched posts");
        Ok(posts)
    }

    /// Like [`Self::try_search`], but any failure is reported and becomes an
    /// empty result.
    pub async fn search(&self, keyword: &str, max_results: usize) -> Vec<RawPost> {
        match self.try_search(keyword, max_results).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(error = %e, keyword, "Search failed");
                println!("{e}");
                Vec::new()
            }
        }
    }
}

/// Map a search response into posts, resolving authors from the expansions.
fn normalize(response: SearchResponse) -> Vec<RawPost> {
    let Some(tweets) = response.data else {
        return Vec::new();
    };

    let users: HashMap<String, ApiUser> = response
        .includes
        .map(|i| i.users)
        .unwrap_or_default()
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    tweets
        .into_iter()
        .map(|tweet| {
            let author_id = tweet.author_id.unwrap_or_default();
            let author = users.get(&author_id);
            let username = author.map_or(UNKNOWN_AUTHOR, |a| a.username.as_str());
            let name = author.map_or(UNKNOWN_AUTHOR, |a| a.name.as_str());
            let verified = author.is_some_and(|a| a.verified);

            RawPost {
                permalink: RawPost::permalink_for(username, &tweet.id),
                author_username: username.to_string(),
                author_name: name.to_string(),
                author_verified: verified,
                author_id,
                id: tweet.id,
                text: tweet.text,
                created_at: tweet.created_at,
                like_count: tweet.public_metrics.like_count,
                retweet_count: tweet.public_metrics.retweet_count,
                reply_count: tweet.public_metrics.reply_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned body and records the requested page sizes.
    struct CannedClient {
        body: serde_json::Value,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl CannedClient {
        fn new(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SearchClient for CannedClient {
        async fn search_recent(&self, query: &str, max_results: usize) -> Result<SearchResponse> {
            self.calls
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            Ok(serde_json::from_value(self.body.clone())?)
        }
    }

    struct FailingClient;

    #[async_trait]
    impl SearchClient for FailingClient {
        async fn search_recent(&self, _query: &str, _max_results: usize) -> Result<SearchResponse> {
            Err(AnalyzerError::Fetch {
                reason: "connection refused".to_string(),
            })
        }
    }

    fn tweet(id: &str, author_id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "text": format!("post {id}"),
            "created_at": "2025-02-15T10:30:00.000Z",
            "author_id": author_id,
            "public_metrics": {"retweet_count": 1, "reply_count": 2, "like_count": 3, "quote_count": 4}
        })
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            PostFetcher::build_query("artificial intelligence"),
            "artificial intelligence -is:retweet lang:en"
        );
    }

    #[tokio::test]
    async fn test_search_resolves_authors() {
        let client = CannedClient::new(serde_json::json!({
            "data": [tweet("1", "a"), tweet("2", "missing")],
            "includes": {"users": [{"id": "a", "name": "Alice", "username": "alice", "verified": true}]}
        }));
        let fetcher = PostFetcher::new(client.clone());

        let posts = fetcher.try_search("rust", 50).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author_name, "Alice");
        assert_eq!(posts[0].author_username, "alice");
        assert!(posts[0].author_verified);
        assert_eq!(posts[0].permalink, "https://twitter.com/alice/status/1");
        assert_eq!(posts[0].like_count, 3);
        assert_eq!(posts[0].retweet_count, 1);
        assert_eq!(posts[0].reply_count, 2);

        assert_eq!(posts[1].author_name, "unknown");
        assert_eq!(posts[1].author_username, "unknown");
        assert!(!posts[1].author_verified);
        assert_eq!(posts[1].permalink, "https://twitter.com/unknown/status/2");

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0], ("rust -is:retweet lang:en".to_string(), 50));
    }

    #[tokio::test]
    async fn test_search_without_includes() {
        let client = CannedClient::new(serde_json::json!({"data": [tweet("1", "a")]}));
        let posts = PostFetcher::new(client).try_search("rust", 10).await.unwrap();
        assert_eq!(posts[0].author_name, "unknown");
    }

    #[tokio::test]
    async fn test_request_size_is_capped() {
        let client = CannedClient::new(serde_json::json!({"meta": {"result_count": 0}}));
        let fetcher = PostFetcher::new(client.clone());

        fetcher.try_search("rust", 500).await.unwrap();
        fetcher.try_search("rust", 3).await.unwrap();

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0].1, 100);
        assert_eq!(calls[1].1, 10);
    }

    #[tokio::test]
    async fn test_small_limits_are_truncated() {
        let client = CannedClient::new(serde_json::json!({
            "data": [tweet("1", "a"), tweet("2", "a"), tweet("3", "a")]
        }));
        let posts = PostFetcher::new(client).try_search("rust", 2).await.unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_zero_limit_skips_request() {
        let client = CannedClient::new(serde_json::json!({"data": [tweet("1", "a")]}));
        let posts = PostFetcher::new(client.clone()).try_search("rust", 0).await.unwrap();
        assert!(posts.is_empty());
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_data_is_empty() {
        let client = CannedClient::new(serde_json::json!({"meta": {"result_count": 0}}));
        let posts = PostFetcher::new(client).search("nothing", 10).await;
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_failure_becomes_empty() {
        let fetcher = PostFetcher::new(Arc::new(FailingClient));
        assert!(fetcher.try_search("rust", 10).await.is_err());
        assert!(fetcher.search("rust", 10).await.is_empty());
    }
}
