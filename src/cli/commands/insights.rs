//! Insights Command
//!
//! Load analysis records for a selection and print the aggregated blocks.

use crate::cli::ui::{Output, render_insights};
use crate::cli::util::{CommandContext, build_selection};
use crate::insights::InsightFeed;
use crate::types::Result;

pub async fn run(
    ctx: &CommandContext,
    banks: &str,
    criteria: &str,
    product: Option<&str>,
    format: &str,
) -> Result<()> {
    let output = Output::new();
    let selection = build_selection(banks, criteria, product, &[], &ctx.config)?;

    let report = InsightFeed::load(ctx.insights.as_ref(), &selection).await;

    if format == "json" {
        output.json(&report)?;
    } else {
        output.block(&render_insights(&report));
    }

    Ok(())
}
