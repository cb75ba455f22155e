//! `actionbot tools` and `actionbot call` — inspect and invoke the registry.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use actionbot_agent::build_registry;

use crate::helpers;

/// List enabled tools, or print their JSON definitions.
pub fn list(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = helpers::load(config_path);
    let (registry, _) = build_registry(&config)?;

    if json {
        let defs = registry.get_definitions();
        println!("{}", serde_json::to_string_pretty(&defs)?);
    } else {
        for name in registry.tool_names() {
            println!("{name}");
        }
    }
    Ok(())
}

/// Invoke one tool. Returns whether the result status was `success`.
pub async fn call(config_path: Option<&Path>, tool: &str, args: &str) -> Result<bool> {
    let params = parse_args(args)?;
    let config = helpers::load(config_path);
    let (registry, _) = build_registry(&config)?;

    info!(tool = %tool, "calling tool");
    let result = registry.execute(tool, params).await;
    helpers::print_result(tool, &result)?;
    Ok(result.is_success())
}

fn parse_args(raw: &str) -> Result<HashMap<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("--args must be valid JSON")?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => anyhow::bail!("--args must be a JSON object"),
    }
}
