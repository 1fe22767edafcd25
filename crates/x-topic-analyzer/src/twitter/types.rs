//! X post data types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Fallback used when a post's author is missing from the response.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A fetched post, normalized from the search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    /// Unique post ID.
    pub id: String,
    /// Full post text.
    pub text: String,
    /// When the post was created, in the offset the API reported.
    pub created_at: DateTime<FixedOffset>,
    pub author_id: String,
    pub author_username: String,
    pub author_name: String,
    #[serde(default)]
    pub author_verified: bool,
    pub like_count: u64,
    pub retweet_count: u64,
    pub reply_count: u64,
    /// Link to the post on the web.
    pub permalink: String,
}

impl RawPost {
    /// Build the public link for a post.
    #[must_use]
    pub fn permalink_for(username: &str, id: &str) -> String {
        format!("https://twitter.com/{username}/status/{id}")
    }
}

/// Response body of `GET /2/tweets/search/recent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching posts. Absent when nothing matched.
    #[serde(default)]
    pub data: Option<Vec<ApiTweet>>,
    /// Expanded objects referenced by the posts.
    #[serde(default)]
    pub includes: Option<Includes>,
}

/// Expansions block of a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Includes {
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

/// A post as returned by the v2 API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiTweet {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

/// Engagement counters of a post.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

/// A user object from the `includes.users` expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub verified: bool,
}

/// Error body returned by the v2 API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiProblem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiProblem {
    /// Best human-readable message in the problem body.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.title.as_deref())
    }
}
