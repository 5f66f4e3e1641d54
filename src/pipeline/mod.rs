//! The guarded query pipeline.
//!
//! A single `QuerySession` is threaded through an explicit stage sequence:
//! intent extraction, query synthesis, safety gate, execution, optional
//! analysis, result shaping and response composition. Any stage that records
//! a session error diverts the run to the error path; the composer is the
//! only stage that writes `final_text`.

use std::sync::Arc;

use log::{error, info, warn};
use serde::Serialize;

use crate::db::Database;
use crate::llm::ChatModel;
use crate::models::{ErrorKind, QuerySession, Row, Visualization};
use crate::safety::{self, GateDecision};

mod analysis;
mod compose;
mod intent;
mod shaping;
mod synthesis;

pub use compose::EXAMPLE_QUESTIONS;
pub use shaping::{shape, shape_branch, ShapeBranch};

/// Pipeline position. One session moves Start → ... → Terminal exactly once;
/// `Errored` is reachable from any stage that records a session error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    IntentExtracted,
    QuerySynthesized,
    Gated,
    Executed,
    Shaped,
    SkipShape,
    Composed,
    Errored,
    Terminal,
}

/// Terminal payload handed back to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub final_text: String,
    pub visualization: Option<Visualization>,
    pub query_text: String,
    pub result_rows: Vec<Row>,
}

impl From<QuerySession> for AgentReply {
    fn from(session: QuerySession) -> Self {
        Self {
            final_text: session.final_text,
            visualization: session.visualization,
            query_text: session.query_text,
            result_rows: session.result_rows,
        }
    }
}

pub struct Agent {
    model: Arc<dyn ChatModel>,
    db: Database,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, db: Database) -> Self {
        Self { model, db }
    }

    /// Pipeline entry point: one question in, one terminal payload out.
    pub async fn process(&self, question: &str) -> AgentReply {
        self.run_session(question).await.into()
    }

    /// Run the full state machine and return the finished session. Exposed
    /// so callers (and tests) can inspect intent and error state directly.
    pub async fn run_session(&self, question: &str) -> QuerySession {
        let mut session = QuerySession::new(question);
        let mut stage = Stage::Start;

        loop {
            stage = match stage {
                Stage::Start => {
                    session.intent =
                        Some(intent::extract_intent(self.model.as_ref(), question).await);
                    Stage::IntentExtracted
                }
                Stage::IntentExtracted => self.synthesize(&mut session).await,
                Stage::QuerySynthesized => gate(&mut session),
                Stage::Gated => self.execute(&mut session).await,
                Stage::Executed => self.analyze_and_branch(&mut session).await,
                Stage::Shaped => {
                    session.visualization = shaping::shape(&session.result_rows);
                    Stage::Composed
                }
                Stage::SkipShape => Stage::Composed,
                Stage::Composed | Stage::Errored => {
                    compose::compose(&mut session);
                    Stage::Terminal
                }
                Stage::Terminal => break,
            };
        }

        session
    }

    /// IntentExtracted → QuerySynthesized, unless the question is off-topic
    /// (straight to composition) or the synthesis collaborator fails.
    async fn synthesize(&self, session: &mut QuerySession) -> Stage {
        let Some(intent) = session.intent.clone() else {
            // Cannot happen after Start, but degrade the same way the intent
            // stage does rather than panic.
            session.intent = Some(crate::models::Intent::generic());
            return Stage::IntentExtracted;
        };

        if !intent.is_data_related {
            info!("Question classified as off-topic; skipping query stages");
            return Stage::Composed;
        }

        match synthesis::synthesize_query(self.model.as_ref(), &intent).await {
            Ok(sql) => {
                session.query_text = sql;
                Stage::QuerySynthesized
            }
            Err(err) => {
                error!("Query synthesis failed: {err:#}");
                session.fail(ErrorKind::QuerySynthesisFailure, format!("{err:#}"));
                Stage::Errored
            }
        }
    }

    /// Gated → Executed, or Errored on any store failure.
    async fn execute(&self, session: &mut QuerySession) -> Stage {
        match self.db.query_rows(&session.query_text).await {
            Ok(rows) => {
                session.result_rows = rows;
                Stage::Executed
            }
            Err(err) => {
                error!("Query execution failed: {err:#}");
                session.fail(ErrorKind::ExecutionFailure, format!("{err:#}"));
                Stage::Errored
            }
        }
    }

    /// Executed → Shaped | SkipShape. The analysis narrative is attached
    /// first when available; its failure is never fatal. The shaping
    /// predicate is evaluated exactly once, here.
    async fn analyze_and_branch(&self, session: &mut QuerySession) -> Stage {
        if !session.result_rows.is_empty() {
            match analysis::summarize_results(self.model.as_ref(), session).await {
                Ok(summary) => session.analysis_text = Some(summary),
                Err(err) => {
                    warn!("Analysis narrative failed ({err}); continuing without it");
                }
            }
        }

        let kind = session
            .intent
            .as_ref()
            .map(|intent| intent.query_type)
            .unwrap_or_default();
        match shaping::shape_branch(kind, session.result_rows.len()) {
            ShapeBranch::Visualize => Stage::Shaped,
            ShapeBranch::Skip => Stage::SkipShape,
        }
    }
}

/// QuerySynthesized → Gated, or Errored with the triggering pattern.
fn gate(session: &mut QuerySession) -> Stage {
    match safety::check(&session.query_text) {
        GateDecision::Permitted => Stage::Gated,
        GateDecision::Rejected(reason) => {
            warn!("Safety gate rejected query: {reason}");
            session.fail(ErrorKind::SafetyViolation, reason);
            Stage::Errored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ErrorKind;

    #[test]
    fn gate_rejection_freezes_session_fields() {
        let mut session = QuerySession::new("drop everything");
        session.query_text = "DROP TABLE nyc_311".to_string();

        let next = gate(&mut session);
        assert_eq!(next, Stage::Errored);

        let error = session.error.as_ref().expect("error set");
        assert_eq!(error.kind, ErrorKind::SafetyViolation);

        // A later failure must not replace the original cause, and the data
        // fields stay untouched.
        session.fail(ErrorKind::ExecutionFailure, "later failure");
        assert_eq!(
            session.error.as_ref().map(|e| e.kind),
            Some(ErrorKind::SafetyViolation)
        );
        assert!(session.result_rows.is_empty());
        assert!(session.visualization.is_none());
        assert!(session.analysis_text.is_none());
    }

    #[test]
    fn gate_permits_select_and_advances() {
        let mut session = QuerySession::new("top complaints");
        session.query_text = "SELECT complaint_type FROM nyc_311 LIMIT 5".to_string();
        assert_eq!(gate(&mut session), Stage::Gated);
        assert!(!session.has_failed());
    }
}
