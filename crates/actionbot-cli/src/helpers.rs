//! Shared CLI helpers — config loading and result printing.

use std::path::Path;

use colored::Colorize;

use actionbot_core::config::{get_config_path, load_config, Config};
use actionbot_core::types::ToolResult;

/// Load configuration from `path`, or the default location.
pub fn load(path: Option<&Path>) -> Config {
    load_config(path)
}

/// The config file that `load` reads.
pub fn config_file(path: Option<&Path>) -> std::path::PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(get_config_path)
}

/// Print a tool result as pretty JSON on stdout, with a one-line colored
/// verdict on stderr.
pub fn print_result(tool: &str, result: &ToolResult) -> anyhow::Result<()> {
    let verdict = if result.is_success() {
        "✓ success".green()
    } else {
        "✗ error".red()
    };
    eprintln!("{} {}", tool.bold(), verdict);
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
