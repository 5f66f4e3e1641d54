//! Intent extraction stage.
//!
//! Asks the interpretation service to classify the question against the
//! fixed schema. Any failure here, transport or parse, degrades to a generic
//! intent so a noisy external service cannot kill the pipeline. The trade-off
//! is an occasional misclassification, which is accepted.

use log::{info, warn};

use crate::db::schema::SCHEMA_CONTEXT;
use crate::llm::{strip_markdown_fences, ChatModel};
use crate::models::Intent;

const INTENT_SYSTEM_PROMPT: &str = "\
You are an expert data analyst for NYC 311 service requests. Parse the user's \
question and extract structured intent.

IMPORTANT: respond with valid JSON only. No explanations, no markdown, just \
pure JSON.

Fields:
- query_type: one of top_n, time_analysis, geographic_analysis, comparison, \
data_quality, trend_analysis, general
- entity: what to analyze (complaint_type, agency, borough, zip_clean, ...)
- metric: what to measure (count, percentage, average_time, ...)
- filters: conditions as an object, or null
- limit: number of results needed, or null
- is_data_related: false when the question is not about the 311 dataset
- is_greeting: true when the message is a greeting or small talk
- complexity: \"concise\" or \"detailed\" (detailed when the user asks for \
in-depth analysis or insights)

Example response:
{\"query_type\": \"top_n\", \"entity\": \"complaint_type\", \"metric\": \"count\", \
\"filters\": null, \"limit\": 10, \"is_data_related\": true, \"is_greeting\": false, \
\"complexity\": \"concise\"}";

/// Parse the service's raw reply into an `Intent`. Fences are stripped first;
/// a parse failure falls back to the generic intent.
pub fn parse_intent(raw: &str) -> Intent {
    let cleaned = strip_markdown_fences(raw);
    if cleaned.is_empty() {
        warn!("Empty response from intent extraction; using generic intent");
        return Intent::generic();
    }

    match serde_json::from_str::<Intent>(&cleaned) {
        Ok(intent) => intent,
        Err(err) => {
            warn!("Unparseable intent response ({err}); using generic intent");
            Intent::generic()
        }
    }
}

/// Invoke the interpretation service. Never fails: transport errors also
/// degrade to the generic intent.
pub async fn extract_intent(model: &dyn ChatModel, question: &str) -> Intent {
    let user = format!(
        "Database schema:\n{SCHEMA_CONTEXT}\n\nUser question: {question}"
    );

    match model.chat(INTENT_SYSTEM_PROMPT, &user).await {
        Ok(raw) => {
            let intent = parse_intent(&raw);
            info!("Intent extracted: kind={}", intent.query_type.as_str());
            intent
        }
        Err(err) => {
            warn!("Intent extraction call failed ({err}); using generic intent");
            Intent::generic()
        }
    }
}
