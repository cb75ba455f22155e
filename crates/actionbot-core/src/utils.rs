//! Utility helpers — data paths and length-bounded text.

use std::path::PathBuf;

/// Marker appended to a log excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "...\n[Logs truncated due to length]";

/// Get the Actionbot data directory (e.g. `~/.actionbot/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".actionbot")
}

/// Keep the first `max_chars` characters of `s`, appending `marker` if anything was cut.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character.
pub fn excerpt(s: &str, max_chars: usize, marker: &str) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &s[..byte_idx], marker),
        None => s.to_string(),
    }
}

/// Truncate a string to `max_len` characters, adding "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
