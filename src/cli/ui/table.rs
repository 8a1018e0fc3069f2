//! Text rendering of comparison results and insights.

use chrono::{DateTime, Utc};
use console::{Alignment, measure_text_width, pad_str, style};

use crate::catalog;
use crate::evaluate::{WinnerTable, win_counts};
use crate::fetch::FetchSnapshot;
use crate::insights::InsightReport;
use crate::types::{InsightCategory, Selection};

const MIN_CELL_WIDTH: usize = 6;

fn product_name(selection: &Selection) -> &str {
    catalog::product(selection.product())
        .map(|product| product.name)
        .unwrap_or(selection.product())
}

fn freshness(fetched_at: Option<DateTime<Utc>>) -> String {
    match fetched_at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}

/// Matrix with best-performer highlighting, provenance, and status lines.
pub fn render_comparison(selection: &Selection, snapshot: &FetchSnapshot) -> String {
    let mut lines = Vec::new();

    let names: Vec<&str> = selection.entities().iter().map(|e| e.name.as_str()).collect();
    lines.push(
        style(format!("{}: {}", product_name(selection), names.join(" vs ")))
            .bold()
            .to_string(),
    );

    if snapshot.is_mock() {
        lines.push(format!(
            "{} {}",
            style("⚠").yellow(),
            style("Demo data, not authoritative").yellow()
        ));
    }
    if let Some(error) = &snapshot.error {
        lines.push(format!("{} {}", style("✗").red(), error));
    }
    lines.push(String::new());

    let matrix = snapshot.data();
    if matrix.is_empty() {
        lines.push(style("No comparison data available.").dim().to_string());
        return lines.join("\n");
    }

    let table = WinnerTable::build(selection.entities(), selection.criteria(), matrix);

    let label_width = selection
        .criteria()
        .iter()
        .map(|c| measure_text_width(&c.name))
        .max()
        .unwrap_or(0)
        .max(measure_text_width("Criterion"));
    let widths: Vec<usize> = names
        .iter()
        .map(|name| measure_text_width(name).max(MIN_CELL_WIDTH))
        .collect();

    let mut header = vec![pad_str("Criterion", label_width, Alignment::Left, None).to_string()];
    for (name, width) in names.iter().zip(&widths) {
        header.push(pad_str(name, *width, Alignment::Left, None).to_string());
    }
    lines.push(style(header.join("  ")).bold().to_string());

    for criterion in selection.criteria() {
        let mut row = vec![pad_str(&criterion.name, label_width, Alignment::Left, None).to_string()];

        for (entity, width) in selection.entities().iter().zip(&widths) {
            let mut cell = if table.is_best(&entity.id, &criterion.id) {
                style("✓").green().bold().to_string()
            } else {
                style("✗").dim().to_string()
            };
            if let Some(score) = snapshot.confidence().for_cell(&entity.id, &criterion.id) {
                cell.push_str(&format!(" {:.0}%", score * 100.0));
            }
            row.push(pad_str(&cell, *width, Alignment::Left, None).to_string());
        }

        lines.push(row.join("  ").trim_end().to_string());
    }

    lines.push(String::new());
    let total = selection.criteria().len();
    for (entity, count) in selection
        .entities()
        .iter()
        .zip(win_counts(selection.entities(), selection.criteria(), matrix))
    {
        lines.push(format!(
            "  {}  strong in {} of {} categories",
            entity.name, count.wins, total
        ));
    }

    lines.push(String::new());
    if !snapshot.sources().is_empty() {
        let sources: Vec<String> = snapshot
            .sources()
            .iter()
            .map(|source| format!("{} ({})", source.name, source.url))
            .collect();
        lines.push(format!("Sources: {}", sources.join(", ")));
    }
    lines.push(format!("Updated: {}", freshness(snapshot.last_fetch_time())));
    if let Some(note) = snapshot.note() {
        lines.push(format!("Note: {}", note));
    }

    lines.join("\n")
}

/// Insight blocks with a badge for their origin.
pub fn render_insights(report: &InsightReport) -> String {
    let mut lines = Vec::new();

    let badge = if report.from_data {
        style("[AI]").cyan().to_string()
    } else {
        style("[Demo]").yellow().to_string()
    };
    lines.push(format!("{} {}", style("AI insights").bold(), badge));
    if let Some(error) = &report.error {
        lines.push(format!("{} {}", style("✗").red(), error));
    }

    for block in &report.blocks {
        let marker = match block.category {
            InsightCategory::Best => style("★").green(),
            InsightCategory::Advantage => style("▲").cyan(),
            InsightCategory::Improvement => style("●").yellow(),
        };
        lines.push(String::new());
        lines.push(format!("{} {}", marker, style(&block.title).bold()));
        lines.push(block.description.clone());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchPhase, FetchState};
    use crate::insights::{InsightFeed, fallback_insights};
    use crate::types::{
        AnalysisRecord, AnalysisType, BenchError, ComparisonMatrix, ConfidenceMap, Criterion,
        Entity, FetchResult, SourceRecord,
    };

    fn settled(result: FetchResult, error: Option<&str>) -> FetchSnapshot {
        FetchSnapshot {
            result,
            loading: false,
            error: error.map(str::to_string),
            phase: FetchPhase::Idle,
        }
    }

    fn selection() -> Selection {
        Selection::new(
            vec![Entity::new("sber", "Sberbank"), Entity::new("vtb", "VTB")],
            vec![
                Criterion::new("cost", "Service cost"),
                Criterion::new("sms", "SMS notifications"),
            ],
            "cards",
        )
    }

    #[test]
    fn test_render_matrix() {
        console::set_colors_enabled(false);

        let result = FetchResult {
            matrix: ComparisonMatrix::new()
                .with("sber", "cost", true)
                .with("vtb", "cost", false)
                .with("sber", "sms", true)
                .with("vtb", "sms", true),
            sources: vec![SourceRecord::new(Some(1), "Banki.ru", "https://banki.ru")],
            confidence: ConfidenceMap::from_scores([("sber.cost".to_string(), 0.9)]),
            is_synthetic: false,
            note: Some("Data from 2024-05-01 10:30".to_string()),
            ..FetchResult::empty()
        };

        let text = render_comparison(&selection(), &settled(result, None));
        assert!(text.starts_with("Cards: Sberbank vs VTB"));
        assert!(text.contains("✓ 90%"));
        assert!(text.contains("Sberbank  strong in 2 of 2 categories"));
        assert!(text.contains("VTB  strong in 1 of 2 categories"));
        assert!(text.contains("Sources: Banki.ru (https://banki.ru)"));
        assert!(text.contains("Updated: never"));
        assert!(text.contains("Note: Data from 2024-05-01 10:30"));
        assert!(!text.contains("Demo data"));
    }

    #[test]
    fn test_render_synthetic_with_error() {
        console::set_colors_enabled(false);

        let text = render_comparison(
            &selection(),
            &settled(FetchResult::empty(), Some("API error: 503")),
        );
        assert!(text.contains("⚠ Demo data, not authoritative"));
        assert!(text.contains("✗ API error: 503"));
        assert!(text.contains("No comparison data available."));
    }

    #[test]
    fn test_render_failed_refresh_keeps_matrix() {
        console::set_colors_enabled(false);

        let mut state = FetchState::new();
        let seq = state.begin();
        state.apply(
            seq,
            Ok(FetchResult {
                matrix: ComparisonMatrix::new().with("sber", "cost", true),
                is_synthetic: false,
                note: Some("Cached by backend".to_string()),
                ..FetchResult::empty()
            }),
        );
        let text = render_comparison(&selection(), &state.snapshot());
        assert!(!text.contains("Demo data"));

        let seq = state.begin();
        state.apply(seq, Err(BenchError::Transport("API error: 502".into())));
        let text = render_comparison(&selection(), &state.snapshot());
        assert!(text.contains("⚠ Demo data, not authoritative"));
        assert!(text.contains("✗ API error: 502"));
        assert!(text.contains("Sberbank  strong in 1 of 2 categories"));
        assert!(text.contains("Note: Cached by backend"));
    }

    #[test]
    fn test_render_insights_badge() {
        console::set_colors_enabled(false);

        let demo = InsightReport {
            blocks: fallback_insights(),
            from_data: false,
            error: None,
        };
        let text = render_insights(&demo);
        assert!(text.contains("[Demo]"));
        assert_eq!(text.matches('★').count(), 1);

        let records = vec![AnalysisRecord::new(AnalysisType::Facts, "sber", "3.5% on balance")];
        let text = render_insights(&InsightFeed::from_records(&records, "cards"));
        assert!(text.contains("[AI]"));
        assert!(text.contains("• sber: 3.5% on balance"));
    }
}
