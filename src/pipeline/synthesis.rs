//! Query synthesis stage: structured intent to a candidate SQL string.
//!
//! Unlike intent extraction, a failure here is fatal for the run; the caller
//! records it as a `QuerySynthesisFailure`.

use anyhow::{bail, Context, Result};
use log::info;

use crate::db::schema::SCHEMA_CONTEXT;
use crate::llm::{strip_markdown_fences, ChatModel};
use crate::models::Intent;

const SQL_SYSTEM_PROMPT: &str = "\
You are an expert SQL generator for an NYC 311 analytics database (SQLite).

Generate SAFE, READ-ONLY SELECT queries only. Use proper aggregation, \
filtering and ordering, and include a LIMIT clause for large result sets.

Common patterns:
- Top N: SELECT column, COUNT(*) AS count FROM nyc_311 GROUP BY column \
ORDER BY count DESC LIMIT N
- Time analysis: use days_to_close, created_date
- Geographic: use borough, zip_clean
- Data quality: use has_coordinates, is_closed

Return only the SQL query, no explanation, no markdown.";

/// Ask the synthesis service for a query matching the intent. The returned
/// string is a candidate only; the safety gate decides whether it runs.
pub async fn synthesize_query(model: &dyn ChatModel, intent: &Intent) -> Result<String> {
    let intent_json =
        serde_json::to_string(intent).context("failed to serialize intent for synthesis")?;
    let user = format!(
        "Database schema:\n{SCHEMA_CONTEXT}\n\nGenerate SQL for this intent: {intent_json}"
    );

    let raw = model
        .chat(SQL_SYSTEM_PROMPT, &user)
        .await
        .context("query synthesis call failed")?;

    let sql = strip_markdown_fences(&raw);
    if sql.is_empty() {
        bail!("query synthesis returned an empty response");
    }

    info!("Synthesized query: {sql}");
    Ok(sql)
}
