use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The category of question the user asked, as classified by the
/// interpretation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    TopN,
    TimeAnalysis,
    GeographicAnalysis,
    Comparison,
    DataQuality,
    TrendAnalysis,
    General,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::TopN => "top_n",
            QueryKind::TimeAnalysis => "time_analysis",
            QueryKind::GeographicAnalysis => "geographic_analysis",
            QueryKind::Comparison => "comparison",
            QueryKind::DataQuality => "data_quality",
            QueryKind::TrendAnalysis => "trend_analysis",
            QueryKind::General => "general",
        }
    }

    /// Lenient parse: anything unrecognized maps to `General` rather than
    /// failing, since the tag comes from a noisy external service.
    pub fn from_str_loose(value: &str) -> Self {
        match value.trim() {
            "top_n" => QueryKind::TopN,
            "time_analysis" => QueryKind::TimeAnalysis,
            "geographic_analysis" => QueryKind::GeographicAnalysis,
            "comparison" => QueryKind::Comparison,
            "data_quality" => QueryKind::DataQuality,
            "trend_analysis" => QueryKind::TrendAnalysis,
            _ => QueryKind::General,
        }
    }
}

impl Default for QueryKind {
    fn default() -> Self {
        QueryKind::General
    }
}

impl Serialize for QueryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QueryKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(QueryKind::from_str_loose(&value))
    }
}

/// How much detail the answer should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Concise,
    Detailed,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Concise => "concise",
            Complexity::Detailed => "detailed",
        }
    }

    pub fn from_str_loose(value: &str) -> Self {
        match value.trim() {
            "detailed" => Complexity::Detailed,
            _ => Complexity::Concise,
        }
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Concise
    }
}

impl Serialize for Complexity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Complexity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Complexity::from_str_loose(&value))
    }
}

fn default_true() -> bool {
    true
}

/// Structured interpretation of a natural-language question. Every field is
/// defaulted so a partial response from the interpretation service still
/// deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub query_type: QueryKind,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub filters: Option<Value>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default = "default_true")]
    pub is_data_related: bool,
    #[serde(default)]
    pub is_greeting: bool,
    #[serde(default)]
    pub complexity: Complexity,
}

impl Intent {
    /// Safe fallback used when the interpretation service returns something
    /// unusable. Keeps the pipeline moving with a generic count-query intent.
    pub fn generic() -> Self {
        Self {
            query_type: QueryKind::General,
            entity: Some("complaint_type".to_string()),
            metric: Some("count".to_string()),
            filters: None,
            limit: Some(10),
            is_data_related: true,
            is_greeting: false,
            complexity: Complexity::Concise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_kind_round_trips_known_tags() {
        for kind in [
            QueryKind::TopN,
            QueryKind::TimeAnalysis,
            QueryKind::GeographicAnalysis,
            QueryKind::Comparison,
            QueryKind::DataQuality,
            QueryKind::TrendAnalysis,
            QueryKind::General,
        ] {
            assert_eq!(QueryKind::from_str_loose(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_query_kind_maps_to_general() {
        assert_eq!(QueryKind::from_str_loose("pivot_table"), QueryKind::General);
        assert_eq!(QueryKind::from_str_loose(""), QueryKind::General);
    }

    #[test]
    fn partial_intent_json_deserializes_with_defaults() {
        let intent: Intent =
            serde_json::from_str(r#"{"query_type": "top_n", "limit": 10}"#).unwrap();
        assert_eq!(intent.query_type, QueryKind::TopN);
        assert_eq!(intent.limit, Some(10));
        assert!(intent.is_data_related);
        assert!(!intent.is_greeting);
        assert_eq!(intent.complexity, Complexity::Concise);
    }

    #[test]
    fn greeting_flags_deserialize() {
        let intent: Intent = serde_json::from_str(
            r#"{"query_type": "general", "is_data_related": false, "is_greeting": true}"#,
        )
        .unwrap();
        assert!(!intent.is_data_related);
        assert!(intent.is_greeting);
    }
}
