//! Chat-completion client interface.
//!
//! The two language-model collaborators (intent extraction and SQL synthesis)
//! are remote and non-deterministic, so they sit behind the `ChatModel` trait
//! and tests substitute canned responses.

use anyhow::Result;
use async_trait::async_trait;

mod client;

pub use client::DeepSeekClient;

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one system + user message pair and return the assistant text.
    async fn chat(&self, system: &str, user: &str) -> Result<String>;
}

/// Remove a single surrounding markdown code fence (with optional info
/// string, e.g. ```sql or ```json) that models add despite being asked not
/// to, then trim.
pub fn strip_markdown_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let body = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest,
    };
    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(strip_markdown_fences("SELECT 1"), "SELECT 1");
        assert_eq!(strip_markdown_fences("  SELECT 1\n"), "SELECT 1");
    }

    #[test]
    fn strips_fence_with_info_string() {
        let fenced = "```sql\nSELECT * FROM nyc_311 LIMIT 5\n```";
        assert_eq!(strip_markdown_fences(fenced), "SELECT * FROM nyc_311 LIMIT 5");
    }

    #[test]
    fn strips_bare_fence_around_json() {
        let fenced = "```\n{\"query_type\": \"top_n\"}\n```";
        assert_eq!(strip_markdown_fences(fenced), "{\"query_type\": \"top_n\"}");
    }
}
