//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use actionbot_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("API base: {}", cfg.github.api_base);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, get_config_path, load_config, parse_allow_list};
pub use schema::{Config, EventContext, GithubConfig, ToolsConfig};
