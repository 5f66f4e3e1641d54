//! Response composition: the single place the terminal user-facing text is
//! produced. Exactly one branch runs per session.

use serde_json::Value;

use crate::models::{Complexity, Intent, QuerySession, Row, SessionError};
use crate::utils::format_large_number;

pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "What are the top 10 complaint types?",
    "Which borough has the most complaints?",
    "What percent of complaints are closed within 3 days?",
    "What's the average resolution time by borough?",
];

const MAX_CONCISE_ROWS: usize = 5;
const MAX_DETAILED_ROWS: usize = 10;

/// Render `final_text` for the session. Branch A handles failed runs,
/// Branch B off-topic questions, Branch C everything else.
pub fn compose(session: &mut QuerySession) {
    let text = match (&session.error, &session.intent) {
        (Some(error), _) => compose_error(error),
        (None, Some(intent)) if !intent.is_data_related => compose_off_topic(intent),
        _ => compose_answer(session),
    };
    session.final_text = text;
}

fn compose_error(error: &SessionError) -> String {
    let mut out = format!(
        "I apologize, but {}: {}.\n\nPlease try rephrasing, or ask something like:\n",
        error.kind.label(),
        error.message.trim_end_matches('.')
    );
    for question in EXAMPLE_QUESTIONS.iter().take(3) {
        out.push_str("- \"");
        out.push_str(question);
        out.push_str("\"\n");
    }
    out.trim_end().to_string()
}

fn compose_off_topic(intent: &Intent) -> String {
    if intent.is_greeting {
        let mut out = String::from(
            "Hello! I answer analytical questions about NYC 311 service requests: \
             complaint volumes, agencies, boroughs, resolution times and data quality.\n\
             For example:\n",
        );
        for question in EXAMPLE_QUESTIONS.iter().take(3) {
            out.push_str("- \"");
            out.push_str(question);
            out.push_str("\"\n");
        }
        out.trim_end().to_string()
    } else {
        format!(
            "That question is outside what I can help with. I only answer questions \
             about the NYC 311 service request dataset, such as \"{}\".",
            EXAMPLE_QUESTIONS[0]
        )
    }
}

fn compose_answer(session: &QuerySession) -> String {
    if wants_detail(session) {
        compose_detailed(session)
    } else {
        compose_concise(session)
    }
}

/// Detailed answers are requested through the intent's complexity flag or
/// explicitly in the question itself.
fn wants_detail(session: &QuerySession) -> bool {
    if session
        .intent
        .as_ref()
        .map(|intent| intent.complexity == Complexity::Detailed)
        .unwrap_or(false)
    {
        return true;
    }
    let question = session.user_query.to_lowercase();
    ["detail", "insight", "in-depth", "explain"]
        .iter()
        .any(|needle| question.contains(needle))
}

fn compose_detailed(session: &QuerySession) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(analysis) = &session.analysis_text {
        parts.push(analysis.trim().to_string());
    }

    if session.result_rows.is_empty() {
        parts.push("No rows matched your question.".to_string());
    } else {
        let mut block = String::from("Detailed results:");
        for (index, row) in session.result_rows.iter().take(MAX_DETAILED_ROWS).enumerate() {
            block.push('\n');
            block.push_str(&format!("{}. {}", index + 1, format_row_full(row)));
        }
        parts.push(block);
    }

    parts.push(format!("Query used: `{}`", session.query_text));
    parts.join("\n\n")
}

fn compose_concise(session: &QuerySession) -> String {
    let mut parts: Vec<String> = Vec::new();

    if session.result_rows.is_empty() {
        parts.push("No rows matched your question.".to_string());
    } else {
        let mut block = String::new();
        for (index, row) in session.result_rows.iter().take(MAX_CONCISE_ROWS).enumerate() {
            if index > 0 {
                block.push('\n');
            }
            block.push_str(&format!("{}. {}", index + 1, format_row_concise(row)));
        }
        if session.result_rows.len() > MAX_CONCISE_ROWS {
            block.push_str(&format!(
                "\n... and {} more rows.",
                session.result_rows.len() - MAX_CONCISE_ROWS
            ));
        }
        parts.push(block);
    }

    parts.push(format!("Query used: `{}`", session.query_text));
    parts.join("\n\n")
}

/// "label: value" from the first two columns; rows with fewer than two
/// columns fall back to a generic key:value join.
fn format_row_concise(row: &Row) -> String {
    let mut values = row.values();
    match (values.next(), values.next()) {
        (Some(label), Some(value)) => {
            format!("{}: {}", render_value(label), render_metric(value))
        }
        _ => format_row_full(row),
    }
}

fn format_row_full(row: &Row) -> String {
    row.iter()
        .map(|(name, value)| format!("{name}: {}", render_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Like `render_value`, but compacts large counts (1.2M, 3.4K).
fn render_metric(value: &Value) -> String {
    if let Some(n) = value.as_i64() {
        return format_large_number(n);
    }
    render_value(value)
}
