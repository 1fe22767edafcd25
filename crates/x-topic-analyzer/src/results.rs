//! Tabular results built from fetched posts and their summaries.

use serde::{Deserialize, Serialize};

use crate::twitter::RawPost;

/// Output column names, in order.
pub const COLUMNS: [&str; 8] = [
    "Topic",
    "Author",
    "Author Verified",
    "Post Date",
    "Post Link",
    "Short Summary",
    "Original Text",
    "Engagement",
];

/// Characters of post text kept in the `Original Text` column.
pub const ORIGINAL_TEXT_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Format of the `Post Date` column.
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedRow {
    pub topic: String,
    pub author_display: String,
    pub author_verified: bool,
    pub post_date: String,
    pub post_link: String,
    pub short_summary: String,
    pub original_text: String,
    pub engagement: String,
}

/// Ordered rows of one run.
pub type ResultSet = Vec<AnalyzedRow>;

impl AnalyzedRow {
    /// Build the row for one post and its summary.
    #[must_use]
    pub fn from_post(keyword: &str, post: &RawPost, summary: &str) -> Self {
        Self {
            topic: keyword.to_string(),
            author_display: format!("{} (@{})", post.author_name, post.author_username),
            author_verified: post.author_verified,
            post_date: post.created_at.format(POST_DATE_FORMAT).to_string(),
            post_link: post.permalink.clone(),
            short_summary: summary.to_string(),
            original_text: truncate_text(&post.text),
            engagement: format_engagement(post.like_count, post.retweet_count, post.reply_count),
        }
    }

    /// Cell values in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [Cell<'_>; 8] {
        [
            Cell::Text(&self.topic),
            Cell::Text(&self.author_display),
            Cell::Bool(self.author_verified),
            Cell::Text(&self.post_date),
            Cell::Text(&self.post_link),
            Cell::Text(&self.short_summary),
            Cell::Text(&self.original_text),
            Cell::Text(&self.engagement),
        ]
    }

    /// Cell values rendered as strings, in [`COLUMNS`] order.
    #[must_use]
    pub fn record(&self) -> [String; 8] {
        self.cells().map(|c| c.to_string())
    }
}

/// A single typed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    Text(&'a str),
    Bool(bool),
}

impl std::fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// Map posts and their summaries to rows, preserving order.
///
/// # Panics
///
/// Panics if `posts` and `summaries` differ in length.
#[must_use]
pub fn assemble(keyword: &str, posts: &[RawPost], summaries: &[String]) -> ResultSet {
    assert_eq!(
        posts.len(),
        summaries.len(),
        "every post needs exactly one summary"
    );
    posts
        .iter()
        .zip(summaries)
        .map(|(post, summary)| AnalyzedRow::from_post(keyword, post, summary))
        .collect()
}

/// Keep the first 200 characters, marking anything cut with `...`.
#[must_use]
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(ORIGINAL_TEXT_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Engagement column: likes, reposts and replies.
#[must_use]
pub fn format_engagement(likes: u64, retweets: u64, replies: u64) -> String {
    format!("❤️ {likes} | 🔄 {retweets} | 💬 {replies}")
}
