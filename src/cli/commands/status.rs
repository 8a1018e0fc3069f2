//! Status Command
//!
//! Display backend reachability and the effective fetch settings.

use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::types::{BenchError, Result};

pub async fn run(ctx: &CommandContext, format: &str) -> Result<()> {
    let json_output = format == "json";
    let reachable = ctx.client.health_check().await?;
    let fetch = &ctx.config.fetch;

    if json_output {
        let status = serde_json::json!({
            "api": {
                "base_url": ctx.client.base_url().as_str(),
                "reachable": reachable,
                "timeout_secs": ctx.config.api.timeout_secs,
            },
            "fetch": {
                "enabled": fetch.enabled,
                "refetch_interval_ms": fetch.refetch_interval_ms,
            },
            "selection": {
                "min_entities": ctx.config.selection.min_entities,
                "default_product": ctx.config.selection.default_product,
            }
        });

        let json = serde_json::to_string_pretty(&status).map_err(BenchError::Json)?;
        println!("{}", json);
    } else {
        println!("BankBench Status");
        println!("══════════════════════════════════════");

        println!("Backend: {}", ctx.client.base_url());
        println!(
            "  Reachable: {}",
            if reachable { "yes" } else { "no (mock data will be flagged)" }
        );
        println!("  Timeout:   {}s", ctx.config.api.timeout_secs);
        println!();

        println!("Fetch:");
        println!("  Enabled: {}", fetch.enabled);
        if fetch.refetch_interval_ms > 0 {
            println!("  Refresh: every {}ms", fetch.refetch_interval_ms);
        } else {
            println!("  Refresh: off");
        }
        println!();

        println!("Selection:");
        println!("  Minimum banks:   {}", ctx.config.selection.min_entities);
        println!("  Default product: {}", ctx.config.selection.default_product);
        println!();

        ConfigLoader::show_path();
    }

    Ok(())
}
