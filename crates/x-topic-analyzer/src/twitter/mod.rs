//! X (Twitter) search module.
//!
//! Provides the recent-search client and post normalization.

mod client;
mod fetcher;
mod types;

pub use client::{
    SearchClient, XApiClient, BEARER_TOKEN_ENV_VAR, MAX_RESULTS_PER_CALL, MIN_RESULTS_PER_CALL,
    X_API_BASE,
};
pub use fetcher::PostFetcher;
pub use types::{
    ApiTweet, ApiUser, Includes, PublicMetrics, RawPost, SearchResponse, UNKNOWN_AUTHOR,
};
