//! Benchmark Backend Client
//!
//! Defines the remote collaborators the core consumes: the comparison
//! endpoint and the AI-insights endpoint. The fetch layer only sees the
//! traits, so tests drive it with scripted sources.
//!
//! ## Modules
//!
//! - `http`: reqwest implementation against the benchmark REST API
//! - `wire`: JSON response shapes and their decoding rules

mod http;
mod wire;

pub use http::HttpClient;
pub use wire::{ComparisonResponse, InsightsResponse};

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{AnalysisRecord, FetchResult, Result, Selection};

/// Parameters of one comparison request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonQuery {
    /// Comma-joined entity ids, selection order
    pub banks: String,
    /// Comma-joined criterion ids, selection order
    pub criteria: String,
    pub product: String,
}

impl ComparisonQuery {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            banks: selection.entity_ids(),
            criteria: selection.criterion_ids(),
            product: selection.product().to_string(),
        }
    }

    pub fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("banks", self.banks.as_str()),
            ("criteria", self.criteria.as_str()),
            ("product", self.product.as_str()),
        ]
    }
}

/// Parameters of one insights request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightQuery {
    pub banks: String,
    pub product: String,
    /// Comma-joined criterion ids
    pub criterion: String,
}

impl InsightQuery {
    pub fn from_selection(selection: &Selection) -> Self {
        Self {
            banks: selection.entity_ids(),
            product: selection.product().to_string(),
            criterion: selection.criterion_ids(),
        }
    }

    pub fn params(&self) -> [(&'static str, &str); 3] {
        [
            ("banks", self.banks.as_str()),
            ("product", self.product.as_str()),
            ("criterion", self.criterion.as_str()),
        ]
    }
}

/// Source of comparison matrices.
///
/// One call is one retrieval request. Any failure (transport, status,
/// decoding) is returned as an error; the fetch layer decides what to do.
#[async_trait]
pub trait ComparisonSource: Send + Sync {
    async fn fetch_comparison(&self, query: &ComparisonQuery) -> Result<FetchResult>;

    /// Source name for logs
    fn name(&self) -> &str;
}

/// Source of raw analysis records
#[async_trait]
pub trait InsightSource: Send + Sync {
    /// Absent or malformed `insights` payloads come back as an empty list.
    async fn fetch_insights(&self, query: &InsightQuery) -> Result<Vec<AnalysisRecord>>;
}

pub type SharedComparisonSource = Arc<dyn ComparisonSource>;
pub type SharedInsightSource = Arc<dyn InsightSource>;
