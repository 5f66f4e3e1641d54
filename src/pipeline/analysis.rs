//! Optional analysis stage: a short narrative over the result set.
//!
//! This collaborator call is best-effort; the orchestrator drops the
//! narrative on failure instead of failing the run.

use anyhow::{Context, Result};

use crate::llm::ChatModel;
use crate::models::QuerySession;

const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a data analyst providing insights on NYC 311 service request data. \
Analyze the query results and report key findings, notable patterns and \
actionable context. Be concise and use specific numbers from the results.";

const MAX_ANALYSIS_ROWS: usize = 10;

pub async fn summarize_results(
    model: &dyn ChatModel,
    session: &QuerySession,
) -> Result<String> {
    let preview: Vec<_> = session
        .result_rows
        .iter()
        .take(MAX_ANALYSIS_ROWS)
        .collect();
    let results_json = serde_json::to_string_pretty(&preview)
        .context("failed to serialize result preview for analysis")?;

    let user = format!(
        "Original question: {}\n\nQuery results:\n{}",
        session.user_query, results_json
    );

    let summary = model
        .chat(ANALYSIS_SYSTEM_PROMPT, &user)
        .await
        .context("analysis call failed")?;

    Ok(summary.trim().to_string())
}
