//! Tool registry — the enabled slice of the catalogue.
//!
//! Tools are keyed by [`ToolKind`], so only catalogue tools can be enabled
//! and listings come out in catalogue order. Calls arrive by name from the
//! agent and are resolved through the catalogue first.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use actionbot_core::types::{ToolDefinition, ToolResult};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::base::Tool;
use super::catalog::ToolKind;

/// Enabled tools, each bound to its catalogue entry.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<ToolKind, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Enable `kind`, served by `tool`. A second call for the same kind
    /// replaces the first binding.
    pub fn enable(&mut self, kind: ToolKind, tool: Arc<dyn Tool>) {
        debug_assert_eq!(kind.name(), tool.name());
        info!(tool = kind.name(), "enabled tool");
        self.tools.insert(kind, tool);
    }

    /// Enabled tool names, in catalogue order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.keys().map(|kind| kind.name()).collect()
    }

    /// Function schemas for every enabled tool, in catalogue order.
    pub fn get_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Run the tool the agent named.
    ///
    /// Always yields a `ToolResult`. A name outside the catalogue, a
    /// catalogue tool that is not enabled, and an `Err` from the tool all
    /// become error results.
    pub async fn execute(&self, name: &str, params: HashMap<String, Value>) -> ToolResult {
        let Some(tool) = ToolKind::from_name(name).and_then(|kind| self.tools.get(&kind)) else {
            warn!(tool = name, "tool not enabled");
            return ToolResult::error(format!("Error: Tool '{name}' not found"));
        };

        match tool.execute(params).await {
            Ok(result) => {
                if !result.is_success() {
                    debug!(tool = name, "tool returned error status");
                }
                result
            }
            Err(e) => {
                warn!(tool = name, error = %e, "tool call rejected");
                ToolResult::error(format!("Error: {e}"))
            }
        }
    }
}
