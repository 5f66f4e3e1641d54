//! Safety gate for synthesized SQL.
//!
//! The check is textual rather than parse-based: an allow-list on the leading
//! keyword plus a whole-word block-list anywhere in the text. It is a pure
//! predicate and never fails; a rejection is a normal outcome the pipeline
//! turns into a session error.

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCKED_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(DROP|DELETE|INSERT|UPDATE|ALTER|CREATE)\b")
        .expect("blocked keyword pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Permitted,
    /// Carries the keyword or rule that triggered the rejection.
    Rejected(String),
}

impl GateDecision {
    pub fn is_permitted(&self) -> bool {
        matches!(self, GateDecision::Permitted)
    }
}

/// Classify a candidate query as safe to run or not.
pub fn check(sql: &str) -> GateDecision {
    let trimmed = sql.trim();

    if let Some(found) = BLOCKED_KEYWORDS.find(trimmed) {
        return GateDecision::Rejected(format!(
            "blocked keyword {}",
            found.as_str().to_ascii_uppercase()
        ));
    }

    if !starts_with_select(trimmed) {
        return GateDecision::Rejected("only SELECT queries are allowed".to_string());
    }

    GateDecision::Permitted
}

/// Case-insensitive check that the query opens with the read keyword.
pub fn starts_with_select(sql: &str) -> bool {
    let trimmed = sql.trim_start();
    let head: String = trimmed.chars().take(6).collect();
    if !head.eq_ignore_ascii_case("SELECT") {
        return false;
    }
    // Reject identifiers that merely begin with "select" (e.g. "selections").
    match trimmed.chars().nth(6) {
        Some(c) => !c.is_ascii_alphanumeric() && c != '_',
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_plain_select() {
        let sql = "SELECT complaint_type, COUNT(*) FROM nyc_311 \
                   GROUP BY complaint_type ORDER BY COUNT(*) DESC LIMIT 10";
        assert_eq!(check(sql), GateDecision::Permitted);
    }

    #[test]
    fn permits_select_with_leading_whitespace_and_mixed_case() {
        assert_eq!(check("   select * from nyc_311 limit 5"), GateDecision::Permitted);
        assert_eq!(check("\n\tSeLeCt 1"), GateDecision::Permitted);
    }

    #[test]
    fn rejects_non_select_leading_keyword() {
        for sql in [
            "PRAGMA table_info(nyc_311)",
            "WITH t AS (SELECT 1) SELECT * FROM t",
            "EXPLAIN SELECT * FROM nyc_311",
            "",
            "selections FROM nyc_311",
        ] {
            assert!(
                matches!(check(sql), GateDecision::Rejected(_)),
                "expected rejection for {sql:?}"
            );
        }
    }

    #[test]
    fn rejects_blocked_keyword_anywhere() {
        let decision = check("SELECT * FROM nyc_311; DROP TABLE nyc_311");
        assert_eq!(
            decision,
            GateDecision::Rejected("blocked keyword DROP".to_string())
        );
    }

    #[test]
    fn rejects_mutating_statements() {
        for (sql, keyword) in [
            ("DELETE FROM nyc_311", "DELETE"),
            ("insert into nyc_311 values (1)", "INSERT"),
            ("UPDATE nyc_311 SET status = 'Closed'", "UPDATE"),
            ("ALTER TABLE nyc_311 ADD COLUMN x", "ALTER"),
            ("CREATE TABLE evil (id INTEGER)", "CREATE"),
        ] {
            assert_eq!(
                check(sql),
                GateDecision::Rejected(format!("blocked keyword {keyword}"))
            );
        }
    }

    #[test]
    fn rejects_blocked_keyword_inside_comment_or_subquery() {
        // The check is textual by design, so even commented-out keywords reject.
        assert!(matches!(
            check("SELECT 1 -- drop table nyc_311"),
            GateDecision::Rejected(_)
        ));
        assert!(matches!(
            check("SELECT * FROM (SELECT 1) WHERE EXISTS (SELECT 1) AND 'delete' = 'delete'"),
            GateDecision::Rejected(_)
        ));
    }

    #[test]
    fn column_names_containing_blocked_substrings_pass() {
        // created_date / year_created contain "create" only as a substring,
        // not a whole word.
        let sql = "SELECT created_date, year_created, month_created FROM nyc_311 LIMIT 3";
        assert_eq!(check(sql), GateDecision::Permitted);
    }
}
