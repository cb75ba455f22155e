//! Gist tool — create, read, update, delete, fork, star, and comment on gists.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use actionbot_core::types::ToolResult;
use actionbot_core::utils::{excerpt, truncate_string};
use actionbot_core::ToolError;
use actionbot_github::types::{
    format_timestamp, Gist, GistComment, GistFileContent, GistListKind, GistUpdate, NewGist,
};
use actionbot_github::{GithubClient, GithubError};

use super::base::{
    action_param, bool_or, optional_i64, optional_id, optional_string, optional_string_map, Tool,
};

const VALID_ACTIONS: &[&str] = &[
    "create",
    "list",
    "get",
    "update",
    "delete",
    "fork",
    "star",
    "unstar",
    "is_starred",
    "comments",
    "add_comment",
    "edit_comment",
    "delete_comment",
];

/// File contents longer than this are cut when shown.
const MAX_FILE_CHARS: usize = 50_000;

/// Comment bodies are previewed, not shown in full.
const COMMENT_PREVIEW_CHARS: usize = 200;

const DEFAULT_PER_PAGE: i64 = 30;

/// Gist management over the GitHub API.
pub struct GistTool {
    client: GithubClient,
}

impl GistTool {
    /// `client` should carry the gist token (see `GithubClient::for_gists`).
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    async fn run(&self, action: &str, params: &HashMap<String, Value>) -> anyhow::Result<ToolResult> {
        let gist_id = optional_string(params, "gist_id").filter(|s| !s.is_empty());
        let require_gist = |action: &str| {
            gist_id
                .clone()
                .ok_or_else(|| ToolError::missing("gist_id", action))
        };
        let (per_page, page) = paging(params);

        let result = match action {
            "create" => {
                let files: BTreeMap<String, GistFileContent> = optional_string_map(params, "files")?
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|(name, content)| content.map(|content| (name, GistFileContent { content })))
                    .collect();
                if files.is_empty() {
                    return Ok(validation(ToolError::missing("files", "create")));
                }
                let gist = NewGist {
                    description: optional_string(params, "description").unwrap_or_default(),
                    public: bool_or(params, "public", true),
                    files,
                };
                match self.client.create_gist(&gist).await {
                    Ok(created) => ToolResult::success([
                        "✅ Gist created successfully!".to_string(),
                        format_gist(&created, false),
                    ]),
                    Err(e) => failure("create gist", e),
                }
            }

            "list" => {
                let gist_type = optional_string(params, "gist_type").unwrap_or_else(|| "user".into());
                let Some(kind) = GistListKind::parse(&gist_type) else {
                    return Ok(validation(ToolError::Validation(format!(
                        "gist_type must be one of user, starred, public (got '{gist_type}')"
                    ))));
                };
                let username = optional_string(params, "username").filter(|s| !s.is_empty());
                match self
                    .client
                    .list_gists(kind, username.as_deref(), per_page, page)
                    .await
                {
                    Ok(gists) if gists.is_empty() => {
                        ToolResult::success([format!("No {} gists found", kind.as_str())])
                    }
                    Ok(gists) => {
                        let query = optional_string(params, "search_query").filter(|s| !s.is_empty());
                        let include_content = bool_or(params, "include_content", false);
                        let matching: Vec<&Gist> = gists
                            .iter()
                            .filter(|g| query.as_deref().map_or(true, |q| matches_query(g, q)))
                            .collect();

                        let mut blocks = vec![format!(
                            "📋 Found {} {} gist(s):",
                            matching.len(),
                            kind.as_str()
                        )];
                        blocks.extend(matching.iter().map(|g| {
                            format!("\n{}\n{}", format_gist(g, include_content), "─".repeat(50))
                        }));
                        ToolResult::success(blocks)
                    }
                    Err(e) => failure("list gists", e),
                }
            }

            "get" => {
                let id = match require_gist("get") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                let include_content = bool_or(params, "include_content", false);
                match self.client.get_gist(&id).await {
                    Ok(gist) => ToolResult::success([
                        "📄 Gist Details:".to_string(),
                        format_gist(&gist, include_content),
                    ]),
                    Err(e) => failure("get gist", e),
                }
            }

            "update" => {
                let id = match require_gist("update") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                let files: Option<BTreeMap<String, Option<GistFileContent>>> =
                    optional_string_map(params, "files")?
                    .filter(|f| !f.is_empty())
                    .map(|f| {
                        f.into_iter()
                            .map(|(name, content)| (name, content.map(|content| GistFileContent { content })))
                            .collect()
                    });
                let update = GistUpdate {
                    description: optional_string(params, "description"),
                    files,
                };
                if update.is_empty() {
                    return Ok(validation(ToolError::Validation(
                        "Either description or files must be provided for update".into(),
                    )));
                }
                match self.client.update_gist(&id, &update).await {
                    Ok(gist) => ToolResult::success([
                        "✅ Gist updated successfully!".to_string(),
                        format_gist(&gist, false),
                    ]),
                    Err(e) => failure("update gist", e),
                }
            }

            "delete" => {
                let id = match require_gist("delete") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.delete_gist(&id).await {
                    Ok(()) => ToolResult::success([format!("✅ Gist {id} deleted successfully!")]),
                    Err(e) => failure("delete gist", e),
                }
            }

            "fork" => {
                let id = match require_gist("fork") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.fork_gist(&id).await {
                    Ok(gist) => ToolResult::success([
                        "✅ Gist forked successfully!".to_string(),
                        format_gist(&gist, false),
                    ]),
                    Err(e) => failure("fork gist", e),
                }
            }

            "star" => {
                let id = match require_gist("star") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.star_gist(&id).await {
                    Ok(()) => ToolResult::success([format!("⭐ Gist {id} starred successfully!")]),
                    Err(e) => failure("star gist", e),
                }
            }

            "unstar" => {
                let id = match require_gist("unstar") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.unstar_gist(&id).await {
                    Ok(()) => ToolResult::success([format!("✨ Gist {id} unstarred successfully!")]),
                    Err(e) => failure("unstar gist", e),
                }
            }

            "is_starred" => {
                let id = match require_gist("is_starred") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.is_gist_starred(&id).await {
                    Ok(true) => ToolResult::success([format!("⭐ Gist {id} is starred")]),
                    Ok(false) => ToolResult::success([format!("✨ Gist {id} is not starred")]),
                    Err(e) => failure("check star status", e),
                }
            }

            "comments" => {
                let id = match require_gist("comments") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                match self.client.list_gist_comments(&id, per_page, page).await {
                    Ok(comments) if comments.is_empty() => {
                        ToolResult::success(["💬 No comments found for this gist"])
                    }
                    Ok(comments) => {
                        let mut blocks = vec![format!("💬 Found {} comment(s):", comments.len())];
                        blocks.extend(comments.iter().map(format_comment));
                        ToolResult::success(blocks)
                    }
                    Err(e) => failure("get comments", e),
                }
            }

            "add_comment" => {
                let id = match require_gist("add_comment") {
                    Ok(id) => id,
                    Err(e) => return Ok(validation(e)),
                };
                let Some(text) = comment_text(params) else {
                    return Ok(validation(ToolError::missing("comment_text", "add_comment")));
                };
                match self.client.add_gist_comment(&id, &text).await {
                    Ok(comment) => ToolResult::success([
                        "✅ Comment added successfully!".to_string(),
                        format!("Comment ID: {}", comment.id),
                    ]),
                    Err(e) => failure("add comment", e),
                }
            }

            "edit_comment" => {
                let Some(comment_id) = optional_id(params, "comment_id").filter(|s| !s.is_empty()) else {
                    return Ok(validation(ToolError::missing("comment_id", "edit_comment")));
                };
                let Some(text) = comment_text(params) else {
                    return Ok(validation(ToolError::missing("comment_text", "edit_comment")));
                };
                match self.client.edit_gist_comment(&comment_id, &text).await {
                    Ok(_) => ToolResult::success([format!("✅ Comment {comment_id} updated successfully!")]),
                    Err(e) => failure("edit comment", e),
                }
            }

            "delete_comment" => {
                let Some(comment_id) = optional_id(params, "comment_id").filter(|s| !s.is_empty()) else {
                    return Ok(validation(ToolError::missing("comment_id", "delete_comment")));
                };
                match self.client.delete_gist_comment(&comment_id).await {
                    Ok(()) => ToolResult::success([format!("✅ Comment {comment_id} deleted successfully!")]),
                    Err(e) => failure("delete comment", e),
                }
            }

            other => ToolResult::error(format!(
                "❌ {}",
                ToolError::unknown_action(other, VALID_ACTIONS)
            )),
        };

        Ok(result)
    }
}

#[async_trait]
impl Tool for GistTool {
    fn name(&self) -> &str {
        "gist"
    }

    fn description(&self) -> &str {
        "Manage GitHub gists: create, list, get, update, delete, fork, star and \
         unstar gists, and list, add, edit, or delete gist comments."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": VALID_ACTIONS,
                    "description": "Action to perform"
                },
                "gist_id": { "type": "string", "description": "Gist id (all single-gist actions)" },
                "description": { "type": "string", "description": "Gist description (create/update)" },
                "files": {
                    "type": "object",
                    "description": "filename -> content; null content deletes the file on update",
                    "additionalProperties": { "type": ["string", "null"] }
                },
                "public": { "type": "boolean", "description": "Public gist (create, default true)" },
                "gist_type": {
                    "type": "string",
                    "enum": ["user", "starred", "public"],
                    "description": "Collection to list (default user)"
                },
                "username": { "type": "string", "description": "List this user's public gists" },
                "per_page": { "type": "integer", "minimum": 1, "maximum": 100, "description": "Page size (default 30)" },
                "page": { "type": "integer", "minimum": 1, "description": "Page number (default 1)" },
                "comment_id": { "type": ["string", "integer"], "description": "Comment id (edit/delete comment)" },
                "comment_text": { "type": "string", "description": "Comment body (add/edit comment)" },
                "search_query": { "type": "string", "description": "Filter listed gists by description or file name" },
                "include_content": { "type": "boolean", "description": "Include file contents (default false)" }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, params: HashMap<String, Value>) -> anyhow::Result<ToolResult> {
        let action = action_param(&params).unwrap_or_default();
        debug!(action = %action, "gist");
        self.run(&action, &params).await
    }
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

fn paging(params: &HashMap<String, Value>) -> (u32, u32) {
    let per_page = optional_i64(params, "per_page")
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, 100) as u32;
    let page = optional_i64(params, "page").unwrap_or(1).max(1);
    let page = u32::try_from(page).unwrap_or(u32::MAX);
    (per_page, page)
}

fn comment_text(params: &HashMap<String, Value>) -> Option<String> {
    optional_string(params, "comment_text").filter(|s| !s.is_empty())
}

fn validation(err: ToolError) -> ToolResult {
    ToolResult::error(format!("Error: {err}"))
}

fn failure(what: &str, err: GithubError) -> ToolResult {
    warn!(operation = what, error = %err, "gist call failed");
    ToolResult::error(format!("❌ Failed to {what}: {}", err.api_message()))
}

/// Case-insensitive match on the description or any file name.
fn matches_query(gist: &Gist, query: &str) -> bool {
    let query = query.to_lowercase();
    let in_description = gist
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(&query));
    in_description || gist.files.keys().any(|name| name.to_lowercase().contains(&query))
}

fn format_gist(gist: &Gist, include_content: bool) -> String {
    let mut lines = vec![
        format!("**ID:** {}", gist.id),
        format!("**URL:** {}", gist.html_url.as_deref().unwrap_or("N/A")),
        format!(
            "**Description:** {}",
            gist.description.as_deref().unwrap_or("No description")
        ),
        format!("**Public:** {}", if gist.public { "Yes" } else { "No" }),
        format!("**Created:** {}", format_timestamp(gist.created_at.as_ref())),
        format!("**Updated:** {}", format_timestamp(gist.updated_at.as_ref())),
        format!("**Comments:** {}", gist.comments),
    ];

    if !gist.files.is_empty() {
        lines.push(format!("**Files:** {}", gist.files.len()));
        for (name, file) in &gist.files {
            let lang = file.language.as_deref().unwrap_or("Text");
            lines.push(format!("  - `{name}` ({lang}, {} bytes)", file.size));

            if include_content {
                if let Some(content) = file.content.as_deref().filter(|c| !c.is_empty()) {
                    lines.push(format!("    ```{}", lang.to_lowercase()));
                    lines.push(excerpt(content, MAX_FILE_CHARS, "..."));
                    lines.push("    ```".to_string());
                }
            }
        }
    }

    lines.join("\n")
}

fn format_comment(comment: &GistComment) -> String {
    let user = comment
        .user
        .as_ref()
        .map(|u| u.login.as_str())
        .unwrap_or("Unknown");
    format!(
        "\n**ID:** {}\n**User:** {user}\n**Created:** {}\n**Body:** {}\n{}",
        comment.id,
        format_timestamp(comment.created_at.as_ref()),
        truncate_string(&comment.body, COMMENT_PREVIEW_CHARS),
        "─".repeat(30)
    )
}
