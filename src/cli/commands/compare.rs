//! Compare Command
//!
//! Run one fetch cycle for a selection and print the matrix.
//!
//! Usage:
//!   bankbench compare --banks sber,vtb --criteria cost,sms [--product cards]
//!                     [--custom "Mobile app"] [--format json] [--demo]

use serde_json::json;
use tracing::info;

use crate::cli::ui::{Output, render_comparison};
use crate::cli::util::{CommandContext, build_selection};
use crate::demo;
use crate::evaluate::{WinnerTable, win_counts};
use crate::fetch::{FetchOptions, FetchOrchestrator, FetchSnapshot};
use crate::types::{Result, Selection};

pub struct CompareArgs {
    pub banks: String,
    pub criteria: String,
    pub product: Option<String>,
    pub custom: Vec<String>,
    pub format: String,
    /// Show a synthetic matrix when the fetch failed and nothing is held
    pub demo: bool,
}

pub async fn run(ctx: &CommandContext, args: CompareArgs) -> Result<()> {
    let output = Output::new();
    let selection = build_selection(
        &args.banks,
        &args.criteria,
        args.product.as_deref(),
        &args.custom,
        &ctx.config,
    )?;

    let mut snapshot = fetch_once(ctx, &selection).await;

    if args.demo && snapshot.error.is_some() && snapshot.data().is_empty() {
        info!("Remote fetch failed, rendering demo matrix");
        snapshot.result =
            demo::synthetic_result(selection.entities(), selection.criteria(), &mut rand::rng());
    }

    if args.format == "json" {
        let table = WinnerTable::build(
            selection.entities(),
            selection.criteria(),
            snapshot.data(),
        );
        output.json(&json!({
            "selection": selection,
            "result": snapshot.result,
            "error": snapshot.error,
            "winners": table,
            "win_counts": win_counts(selection.entities(), selection.criteria(), snapshot.data()),
        }))?;
    } else {
        output.block(&render_comparison(&selection, &snapshot));
    }

    Ok(())
}

async fn fetch_once(ctx: &CommandContext, selection: &Selection) -> FetchSnapshot {
    let options = FetchOptions::from_config(&ctx.config.fetch).with_interval_ms(0);
    let mut orchestrator = FetchOrchestrator::new(ctx.client.clone(), options);

    if !options.enabled {
        Output::new().warning("Remote fetch is disabled (fetch.enabled = false)");
    }

    if let Some(handle) = orchestrator.set_selection(selection.clone()) {
        if let Err(e) = handle.await {
            tracing::error!("Fetch task failed: {}", e);
        }
    }

    let snapshot = orchestrator.snapshot();
    orchestrator.shutdown();
    snapshot
}
