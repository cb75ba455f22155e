//! `actionbot status` — show configuration, credentials, and enabled tools.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use actionbot_agent::tools::resolve_allow_list;
use actionbot_agent::ToolKind;

use crate::helpers;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = helpers::load(config_path);
    let config_file = helpers::config_file(config_path);

    println!();
    println!("{}", "🤖 Actionbot Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_file.display(),
        if config_file.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // GitHub
    println!("  {:<18} {}", "API base:".bold(), config.github.api_base);
    println!(
        "  {:<18} {}",
        "Timeout:".bold(),
        format!("{}s", config.github.timeout_secs).dimmed()
    );
    println!("  {:<18} {}", "GitHub token:".bold(), key_status(config.github.token().is_some()));
    println!(
        "  {:<18} {}",
        "Gist token:".bold(),
        key_status(config.github.gist_token().is_some())
    );

    // CI event
    let event = config.event.describe();
    if !event.is_empty() {
        println!();
        println!("  {}", "Event:".bold());
        for line in event.lines() {
            println!("    {line}");
        }
    }

    // Prompts
    if !config.prompts.is_empty() {
        let mut names: Vec<&String> = config.prompts.keys().collect();
        names.sort();
        println!();
        println!("  {}", "Prompts:".bold());
        for name in names {
            println!("    {name}");
        }
    }

    // Tools
    let allow = match config.tools.allow {
        Some(ref names) => names.join(", "),
        None => "ALL".to_string(),
    };
    let selection = resolve_allow_list(config.tools.allow.as_deref());

    println!();
    println!("  {:<18} {}", "Allow-list:".bold(), allow.dimmed());
    println!("  {}", "Tools:".bold());
    for kind in ToolKind::ALL {
        let status = if selection.enabled.contains(&kind) {
            "✓ enabled".green().to_string()
        } else {
            "· disabled".dimmed().to_string()
        };
        println!("    {:<20} {}", kind.name(), status);
    }
    for name in &selection.unknown {
        println!("    {:<20} {}", name, "✗ unknown".red());
    }

    println!();

    Ok(())
}

fn key_status(set: bool) -> String {
    if set {
        format!("{} (set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    }
}
