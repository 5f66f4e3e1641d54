use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Intent, Visualization};

/// A single result row: column name to value, in the column order the
/// executed query produced.
pub type Row = IndexMap<String, Value>;

/// The failure classes that halt a pipeline run. Intent-parse and analysis
/// failures are recovered in place and never reach the session error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    QuerySynthesisFailure,
    SafetyViolation,
    ExecutionFailure,
}

impl ErrorKind {
    /// Short user-facing label for the failure class.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::QuerySynthesisFailure => "I could not generate a query for that question",
            ErrorKind::SafetyViolation => "the generated query was blocked for safety",
            ErrorKind::ExecutionFailure => "the query failed while running",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The single mutable record threaded through every pipeline stage. Created
/// fresh per question; discarded once the terminal payload is returned.
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub user_query: String,
    pub intent: Option<Intent>,
    pub query_text: String,
    pub result_rows: Vec<Row>,
    pub analysis_text: Option<String>,
    pub visualization: Option<Visualization>,
    pub final_text: String,
    pub error: Option<SessionError>,
}

impl QuerySession {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            intent: None,
            query_text: String::new(),
            result_rows: Vec::new(),
            analysis_text: None,
            visualization: None,
            final_text: String::new(),
            error: None,
        }
    }

    /// Record a halting failure. The first failure wins; later calls cannot
    /// overwrite the original cause.
    pub fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(SessionError::new(kind, message));
        }
    }

    pub fn has_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failure_is_preserved() {
        let mut session = QuerySession::new("test");
        session.fail(ErrorKind::SafetyViolation, "blocked keyword DROP");
        session.fail(ErrorKind::ExecutionFailure, "should not replace");

        let error = session.error.expect("error set");
        assert_eq!(error.kind, ErrorKind::SafetyViolation);
        assert_eq!(error.message, "blocked keyword DROP");
    }
}
