//! Actionbot Agent — the tools an LLM agent calls from a CI workflow.
//!
//! This crate contains:
//! - **tools**: Tool trait, catalogue, registry, and the three tools
//!   (`create_subagent`, `system_prompt`, `gist`)
//! - **orchestrator**: dispatch and observation of sub-agent workflow runs
//! - **log_extract**: pluggable extraction of events from run logs

pub mod log_extract;
pub mod orchestrator;
pub mod tools;

pub use log_extract::{BoundedSpanExtractor, FirstLineExtractor, LogEventExtractor, LogExtractEvent};
pub use orchestrator::{SubagentSpec, WorkflowOrchestrator};
pub use tools::{build_registry, Tool, ToolKind, ToolRegistry};
