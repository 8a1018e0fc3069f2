//! Comparison Matrix Types
//!
//! Boolean feature matrix (bank × criterion) with its provenance and
//! freshness metadata.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Entity id → criterion id → "entity satisfies criterion".
///
/// Keys need not be exhaustive. Missing pairs and JSON `null` cells read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComparisonMatrix(HashMap<String, HashMap<String, bool>>);

impl ComparisonMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a cell, `false` when absent
    pub fn get(&self, entity_id: &str, criterion_id: &str) -> bool {
        self.0
            .get(entity_id)
            .and_then(|row| row.get(criterion_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, entity_id: impl Into<String>, criterion_id: impl Into<String>, value: bool) {
        self.0
            .entry(entity_id.into())
            .or_default()
            .insert(criterion_id.into(), value);
    }

    /// Builder-style `set`
    pub fn with(mut self, entity_id: &str, criterion_id: &str, value: bool) -> Self {
        self.set(entity_id, criterion_id, value);
        self
    }

    /// True when the matrix has no entity keys at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.0.len()
    }

    pub fn contains_entity(&self, entity_id: &str) -> bool {
        self.0.contains_key(entity_id)
    }
}

impl<'de> Deserialize<'de> for ComparisonMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, HashMap<String, Option<bool>>> =
            HashMap::deserialize(deserializer)?;

        Ok(Self(
            raw.into_iter()
                .map(|(entity, row)| {
                    let row = row
                        .into_iter()
                        .map(|(criterion, value)| (criterion, value.unwrap_or(false)))
                        .collect();
                    (entity, row)
                })
                .collect(),
        ))
    }
}

/// Where a comparison fact came from. List order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
}

impl SourceRecord {
    pub fn new(id: Option<i64>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Analysis key → confidence score in `[0, 1]`. Sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfidenceMap(HashMap<String, f64>);

impl ConfidenceMap {
    /// Build from raw scores, clamping into `[0, 1]` and dropping NaN.
    pub fn from_scores(scores: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self(
            scores
                .into_iter()
                .filter(|(_, score)| !score.is_nan())
                .map(|(key, score)| (key, score.clamp(0.0, 1.0)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Score for one matrix cell; the backend keys cells as `"<entity>.<criterion>"`.
    pub fn for_cell(&self, entity_id: &str, criterion_id: &str) -> Option<f64> {
        self.get(&cell_key(entity_id, criterion_id))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for ConfidenceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, f64> = HashMap::deserialize(deserializer)?;
        Ok(Self::from_scores(raw))
    }
}

/// Confidence key for one cell
pub fn cell_key(entity_id: &str, criterion_id: &str) -> String {
    format!("{}.{}", entity_id, criterion_id)
}

/// Outcome of one fetch cycle.
///
/// Created fresh per cycle and fully replaces the previous one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResult {
    pub matrix: ComparisonMatrix,
    pub sources: Vec<SourceRecord>,
    pub confidence: ConfidenceMap,
    /// Freshness stamp reported by the backend; `None` until the first success
    pub fetched_at: Option<DateTime<Utc>>,
    /// Set whenever the matrix did not come from the remote source
    pub is_synthetic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FetchResult {
    /// Nothing fetched yet: empty and, by definition, not authoritative
    pub fn empty() -> Self {
        Self {
            matrix: ComparisonMatrix::new(),
            sources: Vec::new(),
            confidence: ConfidenceMap::default(),
            fetched_at: None,
            is_synthetic: true,
            note: None,
        }
    }

    /// Whether callers may trust the matrix as real backend data
    pub fn is_authoritative(&self) -> bool {
        !self.is_synthetic
    }
}

impl Default for FetchResult {
    fn default() -> Self {
        Self::empty()
    }
}
