//! Offline demo mode: fixture posts and canned summaries.
//!
//! Exercises the whole pipeline and export formatting without credentials
//! or network access.

use async_trait::async_trait;
use chrono::DateTime;

use crate::ai::{AIMessage, AIProvider, AIResponse, GenerateOptions, TokenUsage};
use crate::error::{AnalyzerError, Result};
use crate::twitter::{ApiTweet, ApiUser, Includes, PublicMetrics, SearchClient, SearchResponse};

/// Keyword the fixtures were written for.
pub const MOCK_KEYWORD: &str = "artificial intelligence";

/// File prefix for demo exports.
pub const MOCK_PREFIX: &str = "x_analysis_mock";

/// Posts returned by a demo run.
pub const MOCK_POST_COUNT: usize = 5;

struct Fixture {
    id: &'static str,
    user: (&'static str, &'static str, &'static str, bool),
    created_at: &'static str,
    text: &'static str,
    metrics: (u64, u64, u64),
    summary: &'static str,
}

static FIXTURES: [Fixture; MOCK_POST_COUNT] = [
    Fixture {
        id: "1234567890",
        user: ("101", "John Tech", "johntech", true),
        created_at: "2025-02-15T10:30:00Z",
        text: "Latest AI models show promising results in healthcare applications. Researchers report 95% accuracy in medical imaging diagnostics, with early trials suggesting faster turnaround for radiologists and fewer missed findings across a wide range of scan types and patient groups.",
        metrics: (1250, 345, 89),
        summary: "AI continues to reshape industries with breakthrough innovation.",
    },
    Fixture {
        id: "5678901234",
        user: ("102", "Tech News Daily", "technewstoday", true),
        created_at: "2025-02-15T09:15:00Z",
        text: "Fortune 500 companies announce $50B investment in AI infrastructure. This marks the largest single investment in artificial intelligence to date.",
        metrics: (2100, 567, 234),
        summary: "Major tech companies announce significant investments in AI research.",
    },
    Fixture {
        id: "2345678901",
        user: ("103", "AI Research Lab", "airesearchlab", true),
        created_at: "2025-02-15T08:45:00Z",
        text: "Our latest research explores the ethical implications of large language models. Key findings include bias detection and mitigation strategies.",
        metrics: (3400, 892, 567),
        summary: "New study reveals ethical considerations in AI model development.",
    },
    Fixture {
        id: "3456789012",
        user: ("104", "StartUp AI", "aistartupers", false),
        created_at: "2025-02-15T07:20:00Z",
        text: "New AI startup raises $100M Series B funding focused on autonomous systems. The company plans to expand to 5 new markets this year.",
        metrics: (856, 234, 178),
        summary: "Emerging AI startups disrupting traditional business models.",
    },
    Fixture {
        id: "4567890123",
        user: ("105", "ML Engineer", "mlengineers", false),
        created_at: "2025-02-14T22:10:00Z",
        text: "Tutorial: Building production-ready transformer models. Today we cover model optimization, quantization, and deployment best practices.",
        metrics: (645, 289, 145),
        summary: "Technical tutorial on implementing transformer models in production.",
    },
];

/// Search client serving the fixture posts.
#[derive(Debug, Default)]
pub struct MockSearchClient;

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search_recent(&self, query: &str, max_results: usize) -> Result<SearchResponse> {
        tracing::debug!(query, max_results, "Serving fixture posts");

        let mut data = Vec::with_capacity(FIXTURES.len());
        let mut users = Vec::with_capacity(FIXTURES.len());
        for fixture in FIXTURES.iter().take(max_results) {
            let (user_id, name, username, verified) = fixture.user;
            let created_at = DateTime::parse_from_rfc3339(fixture.created_at).map_err(|e| {
                AnalyzerError::Fetch {
                    reason: format!("bad fixture timestamp: {e}"),
                }
            })?;
            let (like_count, retweet_count, reply_count) = fixture.metrics;

            data.push(ApiTweet {
                id: fixture.id.to_string(),
                text: fixture.text.to_string(),
                created_at,
                author_id: Some(user_id.to_string()),
                public_metrics: PublicMetrics {
                    retweet_count,
                    reply_count,
                    like_count,
                    quote_count: 0,
                },
            });
            users.push(ApiUser {
                id: user_id.to_string(),
                name: name.to_string(),
                username: username.to_string(),
                verified,
            });
        }

        Ok(SearchResponse {
            data: Some(data),
            includes: Some(Includes { users }),
        })
    }
}

/// Provider answering with the canned summary of the fixture in the prompt.
#[derive(Debug, Default)]
pub struct MockProvider;

#[async_trait]
impl AIProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        _options: &GenerateOptions,
    ) -> Result<AIResponse> {
        let prompt = messages.last().map_or("", |m| m.content.as_str());
        let summary = FIXTURES
            .iter()
            .find(|f| prompt.contains(f.text))
            .map(|f| f.summary)
            .ok_or_else(|| AnalyzerError::Summary("no canned summary for this post".to_string()))?;

        Ok(AIResponse {
            text: summary.to_string(),
            usage: TokenUsage::default(),
            model: model.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Summarizer;
    use crate::twitter::PostFetcher;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fixtures_round_through_fetcher() {
        let fetcher = PostFetcher::new(Arc::new(MockSearchClient));
        let posts = fetcher.try_search(MOCK_KEYWORD, 50).await.unwrap();

        assert_eq!(posts.len(), MOCK_POST_COUNT);
        assert_eq!(posts[0].author_username, "johntech");
        assert!(posts[0].text.chars().count() > 200);
        assert!(!posts[3].author_verified);
    }

    #[tokio::test]
    async fn test_max_results_limits_fixtures() {
        let fetcher = PostFetcher::new(Arc::new(MockSearchClient));
        let posts = fetcher.try_search(MOCK_KEYWORD, 2).await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_provider_matches_post() {
        let summarizer = Summarizer::new(Arc::new(MockProvider), "mock").unwrap();
        let summary = summarizer
            .summarize(FIXTURES[2].text, MOCK_KEYWORD)
            .await;
        assert_eq!(summary, FIXTURES[2].summary);

        let unknown = summarizer.summarize("something else", MOCK_KEYWORD).await;
        assert_eq!(unknown, "Summary generation failed");
    }
}
