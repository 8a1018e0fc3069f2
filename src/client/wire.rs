//! Wire Formats
//!
//! JSON bodies returned by the benchmark backend and the rules for turning
//! them into domain values.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{AnalysisRecord, ComparisonMatrix, ConfidenceMap, FetchResult, SourceRecord};

/// `GET /compare/` response body
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonResponse {
    pub date: String,
    pub sources: Vec<SourceRecord>,
    pub data: ComparisonMatrix,
    #[serde(default)]
    pub confidence: Option<ConfidenceMap>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub is_mock: Option<bool>,
}

impl ComparisonResponse {
    /// Convert into a fresh `FetchResult`.
    ///
    /// `received_at` stands in for the freshness stamp when `date` cannot be parsed.
    pub fn into_fetch_result(self, received_at: DateTime<Utc>) -> FetchResult {
        let fetched_at = parse_timestamp(&self.date).unwrap_or_else(|| {
            warn!(
                "Unparsable comparison date '{}', using receipt time",
                self.date
            );
            received_at
        });

        FetchResult {
            matrix: self.data,
            sources: self.sources,
            confidence: self.confidence.unwrap_or_default(),
            fetched_at: Some(fetched_at),
            is_synthetic: self.is_mock.unwrap_or(false),
            note: self.note,
        }
    }
}

/// `GET /ai/insights/` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub insights: Option<Value>,
}

impl InsightsResponse {
    /// Records carried by the response.
    ///
    /// An absent or non-list payload is empty. Rows are decoded one at a
    /// time; a row that does not decode is skipped without dropping the rest.
    pub fn into_records(self) -> Vec<AnalysisRecord> {
        let rows = match self.insights {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                warn!("Ignoring malformed insights payload: expected a list, got {}", other);
                return Vec::new();
            }
        };

        let total = rows.len();
        let records: Vec<AnalysisRecord> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed insight record #{}: {}", index, e);
                    None
                }
            })
            .collect();

        if records.len() < total {
            debug!("Decoded {} of {} insight records", records.len(), total);
        }
        records
    }
}

/// Parse an ISO-ish timestamp: RFC 3339, or naive (assumed UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
