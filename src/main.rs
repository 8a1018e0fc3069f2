use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bankbench::cli::CommandContext;
use bankbench::cli::commands::{self, compare::CompareArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(name = "bankbench")]
#[command(
    version,
    about = "Compare bank products across criteria with backend-sourced data"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Explicit config file (skips the global/project chain)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and display the comparison matrix
    Compare {
        #[arg(long, short, help = "Comma-separated bank ids")]
        banks: String,
        #[arg(long, help = "Comma-separated criterion ids")]
        criteria: String,
        #[arg(long, short, help = "Product id (default from config)")]
        product: Option<String>,
        #[arg(long, help = "Add a custom criterion by name (repeatable)")]
        custom: Vec<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
        #[arg(long, help = "Show demo data when the backend is unavailable")]
        demo: bool,
    },

    /// Show AI insights for a selection
    Insights {
        #[arg(long, short, help = "Comma-separated bank ids")]
        banks: String,
        #[arg(long, help = "Comma-separated criterion ids")]
        criteria: String,
        #[arg(long, short, help = "Product id (default from config)")]
        product: Option<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Refresh a comparison periodically
    Watch {
        #[arg(long, short, help = "Comma-separated bank ids")]
        banks: String,
        #[arg(long, help = "Comma-separated criterion ids")]
        criteria: String,
        #[arg(long, short, help = "Product id (default from config)")]
        product: Option<String>,
        #[arg(long, help = "Refresh interval in milliseconds")]
        interval_ms: Option<u64>,
        #[arg(long, help = "Stop after this many refreshes")]
        cycles: Option<usize>,
    },

    /// Check backend availability
    Status {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// List built-in banks, criteria, and products
    Catalog {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mBankBench encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Fallback filter when `RUST_LOG` is unset
fn log_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = log_filter(cli.verbose, cli.quiet);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Compare {
            banks,
            criteria,
            product,
            custom,
            format,
            demo,
        } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::compare::run(
                &ctx,
                CompareArgs {
                    banks,
                    criteria,
                    product,
                    custom,
                    format,
                    demo,
                },
            ))?;
        }
        Commands::Insights {
            banks,
            criteria,
            product,
            format,
        } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::insights::run(
                &ctx,
                &banks,
                &criteria,
                product.as_deref(),
                &format,
            ))?;
        }
        Commands::Watch {
            banks,
            criteria,
            product,
            interval_ms,
            cycles,
        } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::watch::run(
                &ctx,
                WatchArgs {
                    banks,
                    criteria,
                    product,
                    interval_ms,
                    cycles,
                },
            ))?;
        }
        Commands::Status { format } => {
            let ctx = CommandContext::load(cli.config.as_deref())?;
            let rt = Runtime::new()?;
            rt.block_on(commands::status::run(&ctx, &format))?;
        }
        Commands::Catalog { format } => {
            commands::catalog::run(&format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    commands::config::init_global(force)?;
                } else {
                    commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
