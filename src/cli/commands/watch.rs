//! Watch Command
//!
//! Keep a selection refreshed on a timer and print every settled snapshot.
//! Stops after `--cycles` settled snapshots or on Ctrl-C.

use crate::cli::ui::{Output, render_comparison};
use crate::cli::util::{CommandContext, build_selection};
use crate::constants::fetch::MIN_REFETCH_INTERVAL_MS;
use crate::fetch::{FetchOptions, FetchOrchestrator, FetchPhase};
use crate::types::{BenchError, Result};

pub struct WatchArgs {
    pub banks: String,
    pub criteria: String,
    pub product: Option<String>,
    /// Falls back to `fetch.refetch_interval_ms`
    pub interval_ms: Option<u64>,
    pub cycles: Option<usize>,
}

pub async fn run(ctx: &CommandContext, args: WatchArgs) -> Result<()> {
    let output = Output::new();
    let selection = build_selection(
        &args.banks,
        &args.criteria,
        args.product.as_deref(),
        &[],
        &ctx.config,
    )?;

    let interval_ms = args
        .interval_ms
        .unwrap_or(ctx.config.fetch.refetch_interval_ms);
    if interval_ms < MIN_REFETCH_INTERVAL_MS {
        return Err(BenchError::Config(format!(
            "watch needs an interval of at least {}ms (got {})",
            MIN_REFETCH_INTERVAL_MS, interval_ms
        )));
    }

    let options = FetchOptions::from_config(&ctx.config.fetch).with_interval_ms(interval_ms);
    if !options.enabled {
        return Err(BenchError::Config(
            "Remote fetch is disabled (fetch.enabled = false)".to_string(),
        ));
    }

    let mut orchestrator = FetchOrchestrator::new(ctx.client.clone(), options);
    let mut updates = orchestrator.subscribe();
    orchestrator.set_selection(selection.clone());

    output.info(&format!(
        "Refreshing every {}ms, press Ctrl-C to stop",
        interval_ms
    ));

    let mut settled = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if !matches!(snapshot.phase, FetchPhase::Settled { .. }) {
                    continue;
                }

                settled += 1;
                output.section(&format!("Refresh #{}", settled));
                output.block(&render_comparison(&selection, &snapshot));

                if args.cycles.is_some_and(|limit| settled >= limit) {
                    break;
                }
            }
        }
    }

    orchestrator.shutdown();
    output.success(&format!("Stopped after {} refreshes", settled));
    Ok(())
}
