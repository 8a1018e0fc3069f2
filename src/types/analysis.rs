//! Analysis Records and Insight Blocks
//!
//! Raw per-bank analysis rows from the insights backend, and the categorized
//! text blocks they are grouped into.

use serde::{Deserialize, Serialize};

/// Kind of analysis a record carries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisType {
    Facts,
    Comparison,
    Recommendation,
    /// Anything else the backend sends; ignored by aggregation
    Other(String),
}

impl From<String> for AnalysisType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "facts" => Self::Facts,
            "comparison" => Self::Comparison,
            "recommendation" => Self::Recommendation,
            _ => Self::Other(value),
        }
    }
}

impl From<AnalysisType> for String {
    fn from(value: AnalysisType) -> Self {
        match value {
            AnalysisType::Facts => "facts".to_string(),
            AnalysisType::Comparison => "comparison".to_string(),
            AnalysisType::Recommendation => "recommendation".to_string(),
            AnalysisType::Other(other) => other,
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facts => write!(f, "facts"),
            Self::Comparison => write!(f, "comparison"),
            Self::Recommendation => write!(f, "recommendation"),
            Self::Other(other) => write!(f, "{}", other),
        }
    }
}

/// One analysis row as produced by the insights backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub competitor: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub criterion: String,
    /// Nullable on the backend; null reads as empty text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    pub analysis_type: AnalysisType,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl AnalysisRecord {
    pub fn new(
        analysis_type: AnalysisType,
        competitor: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            competitor: competitor.into(),
            product: String::new(),
            criterion: String::new(),
            value: value.into(),
            confidence_score: None,
            analysis_type,
        }
    }
}

/// Presentation category of an insight block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Best,
    Advantage,
    Improvement,
}

impl std::fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Best => write!(f, "best"),
            Self::Advantage => write!(f, "advantage"),
            Self::Improvement => write!(f, "improvement"),
        }
    }
}

/// A categorized, human-readable insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightBlock {
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
}

impl InsightBlock {
    pub fn new(
        category: InsightCategory,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            description: description.into(),
        }
    }
}
