//! Actionbot GitHub — REST client for the endpoints the tools need.
//!
//! - **client**: `GithubClient`, auth headers, redirect handling
//! - **traits**: `WorkflowHost`, the seam the orchestrator talks through
//! - **actions**: `WorkflowHost` for GitHub Actions
//! - **variables**: repository variables
//! - **gists**: gist CRUD, stars, comments

pub mod actions;
pub mod client;
pub mod error;
pub mod gists;
pub mod traits;
pub mod types;
pub mod variables;

pub use client::GithubClient;
pub use error::GithubError;
pub use traits::WorkflowHost;
