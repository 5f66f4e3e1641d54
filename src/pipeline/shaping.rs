//! Result shaping: decide whether a result set is chartable, and derive the
//! visualization descriptor when it is.

use crate::models::{ChartKind, QueryKind, Row, Visualization};

/// Upper bound on the chart row payload, to bound downstream rendering cost.
const MAX_CHART_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeBranch {
    Visualize,
    Skip,
}

fn chart_eligible(kind: QueryKind) -> bool {
    matches!(
        kind,
        QueryKind::TopN
            | QueryKind::Comparison
            | QueryKind::GeographicAnalysis
            | QueryKind::TimeAnalysis
    )
}

/// Pure, total branch predicate: chart only result sets from chart-eligible
/// intents with more than one row.
pub fn shape_branch(kind: QueryKind, row_count: usize) -> ShapeBranch {
    if chart_eligible(kind) && row_count > 1 {
        ShapeBranch::Visualize
    } else {
        ShapeBranch::Skip
    }
}

/// Derive a bar-chart descriptor from the rows. Axis columns come from the
/// first row's column order; missing columns degrade to "no chart" or a
/// missing y axis, never an error.
pub fn shape(rows: &[Row]) -> Option<Visualization> {
    let first = rows.first()?;
    let mut columns = first.keys();
    let x_column = columns.next()?.clone();
    let y_column = columns.next().cloned();

    Some(Visualization {
        kind: ChartKind::Bar,
        rows: rows.iter().take(MAX_CHART_ROWS).cloned().collect(),
        x_column,
        y_column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<IndexMap<_, _>>()
    }

    #[test]
    fn branch_requires_eligible_kind_and_multiple_rows() {
        assert_eq!(shape_branch(QueryKind::TopN, 5), ShapeBranch::Visualize);
        assert_eq!(
            shape_branch(QueryKind::GeographicAnalysis, 2),
            ShapeBranch::Visualize
        );
        assert_eq!(shape_branch(QueryKind::General, 5), ShapeBranch::Skip);
        assert_eq!(shape_branch(QueryKind::DataQuality, 5), ShapeBranch::Skip);
    }

    #[test]
    fn single_row_never_charts_regardless_of_kind() {
        for kind in [
            QueryKind::TopN,
            QueryKind::Comparison,
            QueryKind::GeographicAnalysis,
            QueryKind::TimeAnalysis,
            QueryKind::General,
        ] {
            assert_eq!(shape_branch(kind, 1), ShapeBranch::Skip);
            assert_eq!(shape_branch(kind, 0), ShapeBranch::Skip);
        }
    }

    #[test]
    fn shape_uses_first_two_columns_in_order() {
        let rows = vec![
            row(&[("complaint_type", json!("Noise")), ("count", json!(120))]),
            row(&[("complaint_type", json!("Heat")), ("count", json!(80))]),
        ];
        let viz = shape(&rows).expect("descriptor");
        assert_eq!(viz.kind, ChartKind::Bar);
        assert_eq!(viz.x_column, "complaint_type");
        assert_eq!(viz.y_column.as_deref(), Some("count"));
        assert_eq!(viz.rows.len(), 2);
    }

    #[test]
    fn shape_with_single_column_has_no_y_axis() {
        let rows = vec![row(&[("borough", json!("QUEENS"))]); 3];
        let viz = shape(&rows).expect("descriptor");
        assert_eq!(viz.x_column, "borough");
        assert!(viz.y_column.is_none());
    }

    #[test]
    fn shape_truncates_to_twenty_rows() {
        let rows: Vec<Row> = (0..50)
            .map(|i| row(&[("zip", json!(format!("1{i:04}"))), ("count", json!(i))]))
            .collect();
        let viz = shape(&rows).expect("descriptor");
        assert_eq!(viz.rows.len(), 20);
    }

    #[test]
    fn shape_of_empty_rows_is_absent() {
        assert!(shape(&[]).is_none());
    }
}
