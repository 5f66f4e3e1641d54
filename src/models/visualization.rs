use serde::{Deserialize, Serialize};

use crate::models::Row;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
}

/// Describes how to chart a result set. The row payload is a bounded slice
/// of the result rows; axis columns come from the first row's column order.
#[derive(Debug, Clone, Serialize)]
pub struct Visualization {
    pub kind: ChartKind,
    pub rows: Vec<Row>,
    pub x_column: String,
    pub y_column: Option<String>,
}
