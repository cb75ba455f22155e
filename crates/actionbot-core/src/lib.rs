//! Actionbot Core — shared types, errors, configuration, and helpers.
//!
//! Every other crate in the workspace depends on this one:
//! - **types**: the uniform `ToolResult` shape and LLM-facing `ToolDefinition`
//! - **error**: the `ToolError` taxonomy surfaced by every tool
//! - **config**: JSON config file + environment overrides
//! - **utils**: data paths and text helpers

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::ToolError;
pub use types::{ContentBlock, ToolDefinition, ToolResult, ToolStatus};
