//! Actionbot CLI — the runner that exposes the tool catalogue.
//!
//! # Commands
//!
//! - `actionbot status` — show configuration, credentials, and enabled tools
//! - `actionbot tools [--json]` — list enabled tools or print their definitions
//! - `actionbot call <TOOL> [--args JSON]` — invoke one tool and print its result

mod helpers;
mod status;
mod tools_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🤖 Actionbot — GitHub Actions tools for LLM agents
#[derive(Parser)]
#[command(name = "actionbot", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.actionbot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (also: ACTIONBOT_DEBUG=1)
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration, credentials, and enabled tools
    Status,

    /// List the enabled tools
    Tools {
        /// Print the LLM-facing JSON definitions instead of names
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Invoke a tool once and print its result as JSON
    Call {
        /// Tool name (e.g. create_subagent)
        tool: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs || debug_from_env());

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Status => status::run(config_path),
        Commands::Tools { json } => tools_cmd::list(config_path, json),
        Commands::Call { tool, args } => {
            let ok = tools_cmd::call(config_path, &tool, &args).await?;
            if !ok {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn debug_from_env() -> bool {
    std::env::var("ACTIONBOT_DEBUG")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Initialize tracing/logging. Logs go to stderr so `call` output stays parseable.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("actionbot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
