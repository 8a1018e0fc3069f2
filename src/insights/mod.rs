//! Insight Aggregation
//!
//! Groups flat analysis records into at most three categorized text blocks:
//!
//! ```text
//! facts          -> best         "• <competitor>: <value>" per line
//! comparison     -> advantage    "• <competitor>: <value>" per line
//! recommendation -> improvement  "• <value>" per line
//! ```
//!
//! With no usable records the fixed demo set from [`fallback`] is returned,
//! so the result is never empty.

mod fallback;

pub use fallback::fallback_insights;

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{InsightQuery, InsightSource};
use crate::types::{AnalysisRecord, AnalysisType, InsightBlock, InsightCategory, Selection};

const COMPARISON_TITLE: &str = "Comparative analysis";
const RECOMMENDATION_TITLE: &str = "Recommendations for improvement";

fn facts_title(product: &str) -> String {
    format!("Factual data for {}", product)
}

/// Aggregate records into insight blocks.
///
/// Returns 1 to 3 blocks built from the records, or exactly the 3 fallback
/// blocks when no record has a known analysis type.
pub fn aggregate(records: &[AnalysisRecord], product: &str) -> Vec<InsightBlock> {
    let facts = bucket(records, &AnalysisType::Facts);
    let comparisons = bucket(records, &AnalysisType::Comparison);
    let recommendations = bucket(records, &AnalysisType::Recommendation);

    let mut blocks = Vec::with_capacity(3);

    if !facts.is_empty() {
        blocks.push(InsightBlock::new(
            InsightCategory::Best,
            facts_title(product),
            bullet_lines(&facts, with_competitor),
        ));
    }

    if !comparisons.is_empty() {
        blocks.push(InsightBlock::new(
            InsightCategory::Advantage,
            COMPARISON_TITLE,
            bullet_lines(&comparisons, with_competitor),
        ));
    }

    if !recommendations.is_empty() {
        blocks.push(InsightBlock::new(
            InsightCategory::Improvement,
            RECOMMENDATION_TITLE,
            bullet_lines(&recommendations, |record| record.value.clone()),
        ));
    }

    if blocks.is_empty() {
        debug!(
            "No usable analysis records ({} received), using demo insights",
            records.len()
        );
        return fallback_insights();
    }

    blocks
}

fn bucket<'a>(records: &'a [AnalysisRecord], kind: &AnalysisType) -> Vec<&'a AnalysisRecord> {
    records
        .iter()
        .filter(|record| &record.analysis_type == kind)
        .collect()
}

fn with_competitor(record: &AnalysisRecord) -> String {
    format!("{}: {}", record.competitor, record.value)
}

fn bullet_lines(records: &[&AnalysisRecord], line: impl Fn(&AnalysisRecord) -> String) -> String {
    records
        .iter()
        .map(|record| format!("• {}", line(*record)))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Insight Feed
// =============================================================================

/// Insight blocks plus where they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightReport {
    pub blocks: Vec<InsightBlock>,
    /// True when at least one block was built from backend records
    pub from_data: bool,
    /// Transport error from the insights endpoint, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Loads analysis records for a selection and aggregates them
pub struct InsightFeed;

impl InsightFeed {
    /// Never fails: transport errors degrade to the demo set and are reported in `error`.
    pub async fn load(source: &dyn InsightSource, selection: &Selection) -> InsightReport {
        let query = InsightQuery::from_selection(selection);

        match source.fetch_insights(&query).await {
            Ok(records) => Self::from_records(&records, selection.product()),
            Err(e) => {
                warn!("Failed to fetch AI insights: {}", e);
                InsightReport {
                    blocks: fallback_insights(),
                    from_data: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn from_records(records: &[AnalysisRecord], product: &str) -> InsightReport {
        let from_data = records.iter().any(|record| {
            matches!(
                record.analysis_type,
                AnalysisType::Facts | AnalysisType::Comparison | AnalysisType::Recommendation
            )
        });

        InsightReport {
            blocks: aggregate(records, product),
            from_data,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BenchError, Criterion, Entity, Result};
    use async_trait::async_trait;
    use proptest::prelude::*;

    fn record(kind: AnalysisType, competitor: &str, value: &str) -> AnalysisRecord {
        AnalysisRecord::new(kind, competitor, value)
    }

    fn categories(blocks: &[InsightBlock]) -> Vec<InsightCategory> {
        blocks.iter().map(|b| b.category).collect()
    }

    #[test]
    fn test_empty_input_returns_fallback() {
        let blocks = aggregate(&[], "deposits");
        assert_eq!(
            categories(&blocks),
            vec![
                InsightCategory::Best,
                InsightCategory::Advantage,
                InsightCategory::Improvement
            ]
        );
        assert_eq!(blocks, fallback_insights());
    }

    #[test]
    fn test_facts_and_comparison() {
        let records = vec![
            record(AnalysisType::Facts, "A", "X"),
            record(AnalysisType::Comparison, "B", "Y"),
        ];

        let blocks = aggregate(&records, "cards");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].category, InsightCategory::Best);
        assert_eq!(blocks[0].description, "• A: X");
        assert_eq!(blocks[0].title, "Factual data for cards");
        assert_eq!(blocks[1].category, InsightCategory::Advantage);
        assert_eq!(blocks[1].description, "• B: Y");
    }

    #[test]
    fn test_fixed_order_and_input_order_within_bucket() {
        let records = vec![
            record(AnalysisType::Recommendation, "sber", "Lower premium fees"),
            record(AnalysisType::Facts, "vtb", "5% cashback"),
            record(AnalysisType::Recommendation, "vtb", "Add Apple Pay"),
            record(AnalysisType::Facts, "sber", "3.5% on balance"),
        ];

        let blocks = aggregate(&records, "cards");
        assert_eq!(
            categories(&blocks),
            vec![InsightCategory::Best, InsightCategory::Improvement]
        );
        assert_eq!(blocks[0].description, "• vtb: 5% cashback\n• sber: 3.5% on balance");
        assert_eq!(blocks[1].description, "• Lower premium fees\n• Add Apple Pay");
    }

    #[test]
    fn test_unknown_types_ignored() {
        let records = vec![
            record(AnalysisType::Other("sentiment".into()), "sber", "positive"),
            record(AnalysisType::Comparison, "vtb", "cheaper"),
        ];
        let blocks = aggregate(&records, "cards");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].description, "• vtb: cheaper");

        let only_unknown = vec![record(AnalysisType::Other("raw".into()), "sber", "x")];
        assert_eq!(aggregate(&only_unknown, "cards"), fallback_insights());
    }

    #[test]
    fn test_report_from_records_flags_source() {
        assert!(!InsightFeed::from_records(&[], "cards").from_data);

        let records = vec![record(AnalysisType::Facts, "sber", "x")];
        let report = InsightFeed::from_records(&records, "cards");
        assert!(report.from_data);
        assert!(report.error.is_none());
    }

    struct StaticInsights(std::result::Result<Vec<AnalysisRecord>, String>);

    #[async_trait]
    impl InsightSource for StaticInsights {
        async fn fetch_insights(&self, _query: &InsightQuery) -> Result<Vec<AnalysisRecord>> {
            self.0.clone().map_err(BenchError::Transport)
        }
    }

    fn selection() -> Selection {
        Selection::new(
            vec![Entity::new("sber", "Sberbank")],
            vec![Criterion::new("cost", "Cost")],
            "deposits",
        )
    }

    #[tokio::test]
    async fn test_feed_uses_records() {
        let source = StaticInsights(Ok(vec![record(AnalysisType::Facts, "sber", "x")]));
        let report = InsightFeed::load(&source, &selection()).await;

        assert!(report.from_data);
        assert_eq!(report.blocks[0].title, "Factual data for deposits");
    }

    #[tokio::test]
    async fn test_feed_transport_error_degrades_to_fallback() {
        let source = StaticInsights(Err("API error: 500 (server error)".into()));
        let report = InsightFeed::load(&source, &selection()).await;

        assert!(!report.from_data);
        assert_eq!(report.blocks, fallback_insights());
        assert_eq!(report.error.as_deref(), Some("API error: 500 (server error)"));
    }

    #[test]
    fn test_null_value_record_still_counts_as_data() {
        let body = r#"{"insights": [
            {"competitor": "vtb", "value": "5%", "analysis_type": "facts"},
            {"competitor": "sber", "value": null, "analysis_type": "comparison"}
        ]}"#;
        let records = serde_json::from_str::<crate::client::InsightsResponse>(body)
            .unwrap()
            .into_records();

        let report = InsightFeed::from_records(&records, "cards");
        assert!(report.from_data);
        assert_eq!(
            categories(&report.blocks),
            vec![InsightCategory::Best, InsightCategory::Advantage]
        );
        assert_eq!(report.blocks[0].description, "• vtb: 5%");
        assert_eq!(report.blocks[1].description, "• sber: ");
    }

    fn any_type() -> impl Strategy<Value = AnalysisType> {
        prop_oneof![
            Just(AnalysisType::Facts),
            Just(AnalysisType::Comparison),
            Just(AnalysisType::Recommendation),
            "[a-z]{1,8}".prop_map(AnalysisType::from),
        ]
    }

    proptest! {
        #[test]
        fn prop_aggregate_is_bounded_and_deterministic(
            entries in prop::collection::vec((any_type(), "[a-z]{1,6}", "[a-z ]{0,12}"), 0..20),
        ) {
            let records: Vec<AnalysisRecord> = entries
                .iter()
                .map(|(kind, competitor, value)| record(kind.clone(), competitor, value))
                .collect();

            let blocks = aggregate(&records, "cards");
            prop_assert!(!blocks.is_empty() && blocks.len() <= 3);
            prop_assert_eq!(&blocks, &aggregate(&records, "cards"));

            let order: Vec<_> = categories(&blocks);
            let mut sorted = order.clone();
            sorted.sort_by_key(|c| match c {
                InsightCategory::Best => 0,
                InsightCategory::Advantage => 1,
                InsightCategory::Improvement => 2,
            });
            prop_assert_eq!(order, sorted);
        }
    }
}
