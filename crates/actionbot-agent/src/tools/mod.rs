//! Agent tools and the registry that exposes them.

pub mod base;
pub mod catalog;
pub mod gist;
pub mod registry;
pub mod subagent;
pub mod system_prompt;

pub use base::Tool;
pub use catalog::{build_registry, resolve_allow_list, ToolKind, ToolSelection};
pub use gist::GistTool;
pub use registry::ToolRegistry;
pub use subagent::CreateSubagentTool;
pub use system_prompt::SystemPromptTool;
