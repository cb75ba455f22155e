//! Log event extraction — pull structured hints out of raw workflow logs.
//!
//! Sub-agent runs print `Event: <text>` lines. Two independent strategies
//! read them:
//! - [`BoundedSpanExtractor`]: every `Event:` message up to the next process
//!   launch marker (`python -c` by default), as task prompts;
//! - [`FirstLineExtractor`]: the first `Event:` line only, as the run's
//!   headline event.
//!
//! Both may fire on the same logs. The launch marker is specific to how the
//! workflow starts its agent process and will break if that changes; it is
//! configurable for that reason.

use regex::Regex;

use actionbot_core::utils::{excerpt, TRUNCATION_MARKER};

/// Characters of raw log kept in a status report.
pub const LOG_EXCERPT_CHARS: usize = 1000;

/// Default process launch marker terminating a bounded span.
pub const DEFAULT_LAUNCH_MARKER: &str = "python -c";

/// One piece of information recovered from the logs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogExtractEvent {
    /// A task prompt announced to the sub-agent.
    pub prompt: Option<String>,
    /// A standalone event line.
    pub event_text: Option<String>,
}

impl LogExtractEvent {
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            prompt: Some(text.into()),
            event_text: None,
        }
    }

    pub fn event(text: impl Into<String>) -> Self {
        Self {
            prompt: None,
            event_text: Some(text.into()),
        }
    }
}

/// A strategy for turning raw log text into events.
pub trait LogEventExtractor: Send + Sync {
    /// Short name, for logging.
    fn name(&self) -> &str;

    /// Zero or more events found in `logs`.
    fn extract(&self, logs: &str) -> Vec<LogExtractEvent>;
}

// ─────────────────────────────────────────────
// Bounded span
// ─────────────────────────────────────────────

/// `Event: <message>` spanning lines up to the next launch marker.
pub struct BoundedSpanExtractor {
    pattern: Regex,
}

impl BoundedSpanExtractor {
    pub fn new() -> Self {
        Self::with_marker(DEFAULT_LAUNCH_MARKER)
    }

    /// Use a different launch marker (matched literally).
    pub fn with_marker(marker: &str) -> Self {
        let pattern = format!(r"(?s)Event:\s*(.*?)\n.*?{}", regex::escape(marker));
        Self {
            pattern: Regex::new(&pattern).expect("escaped marker pattern is valid"),
        }
    }
}

impl Default for BoundedSpanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventExtractor for BoundedSpanExtractor {
    fn name(&self) -> &str {
        "bounded_span"
    }

    fn extract(&self, logs: &str) -> Vec<LogExtractEvent> {
        self.pattern
            .captures_iter(logs)
            .filter_map(|caps| caps.get(1))
            .map(|m| LogExtractEvent::prompt(m.as_str().trim()))
            .collect()
    }
}

// ─────────────────────────────────────────────
// First line
// ─────────────────────────────────────────────

/// The first single-line `Event: <text>`.
pub struct FirstLineExtractor {
    pattern: Regex,
}

impl FirstLineExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"Event:\s*(.*?)(?:\n|\r\n)").expect("event pattern is valid"),
        }
    }
}

impl Default for FirstLineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventExtractor for FirstLineExtractor {
    fn name(&self) -> &str {
        "first_line"
    }

    fn extract(&self, logs: &str) -> Vec<LogExtractEvent> {
        self.pattern
            .captures(logs)
            .and_then(|caps| caps.get(1))
            .map(|m| vec![LogExtractEvent::event(m.as_str().trim())])
            .unwrap_or_default()
    }
}

/// The default extractor chain: bounded span, then first line.
pub fn default_extractors() -> Vec<Box<dyn LogEventExtractor>> {
    vec![
        Box::new(BoundedSpanExtractor::new()),
        Box::new(FirstLineExtractor::new()),
    ]
}

/// Length-bounded prefix of the logs for display.
pub fn log_excerpt(logs: &str) -> String {
    excerpt(logs, LOG_EXCERPT_CHARS, TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2024-05-01T12:00:00Z Run agent\n\
        Event: Summarize open issues\n\
        with labels bug and p1\n\
        + python -c 'import runner'\n\
        Event: Draft release notes\n\
        + python -c 'import runner'\n";

    #[test]
    fn test_bounded_span_finds_every_prompt() {
        let events = BoundedSpanExtractor::new().extract(SAMPLE);
        assert_eq!(
            events,
            vec![
                LogExtractEvent::prompt("Summarize open issues"),
                LogExtractEvent::prompt("Draft release notes"),
            ]
        );
    }

    #[test]
    fn test_bounded_span_requires_marker() {
        let events = BoundedSpanExtractor::new().extract("Event: lonely\nno launcher here\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_bounded_span_custom_marker() {
        let logs = "Event: build it\n$ node run.js\n";
        assert!(BoundedSpanExtractor::new().extract(logs).is_empty());
        let events = BoundedSpanExtractor::with_marker("node run.js").extract(logs);
        assert_eq!(events, vec![LogExtractEvent::prompt("build it")]);
    }

    #[test]
    fn test_first_line_takes_only_first() {
        let events = FirstLineExtractor::new().extract(SAMPLE);
        assert_eq!(events, vec![LogExtractEvent::event("Summarize open issues")]);
    }

    #[test]
    fn test_first_line_crlf_trimmed() {
        let events = FirstLineExtractor::new().extract("Event:   shipped  \r\nnext\r\n");
        assert_eq!(events, vec![LogExtractEvent::event("shipped")]);
    }

    #[test]
    fn test_first_line_needs_line_end() {
        assert!(FirstLineExtractor::new().extract("Event: no newline").is_empty());
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_extractors();
        let names: Vec<&str> = chain.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["bounded_span", "first_line"]);
    }

    #[test]
    fn test_log_excerpt_bounds() {
        let long = "x".repeat(1500);
        assert_eq!(
            log_excerpt(&long),
            format!("{}...\n[Logs truncated due to length]", "x".repeat(1000))
        );
        let short = "y".repeat(800);
        assert_eq!(log_excerpt(&short), short);
    }
}
