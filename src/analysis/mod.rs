//! Model-driven analysis of a classified repository.
//!
//! Every reply is expected to carry JSON. A reply that does not parse never
//! aborts the run: it becomes [`AnalysisOutcome::Unparsed`], a warning is
//! recorded, and the item is dropped or defaulted.

use serde::de::DeserializeOwned;

mod lenient;
/// Output-file analysis
pub mod output;
/// Entry points, workflows, scaling and bottlenecks
pub mod workflow;

pub use output::{OutputAnalysis, OutputAnalyzer, OutputFile};
pub use workflow::{
    Bottleneck, EntryPointCandidate, ScalingAssessment, SourceFile, WorkflowAnalysis,
    WorkflowAnalyzer, WorkflowDescription, WorkflowStep, Workaround,
};

/// Result of reading one model reply as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome<T> {
    /// The reply parsed into the expected shape
    Parsed(T),
    /// The reply was unusable; the raw text and parse error are kept
    Unparsed {
        /// Reply as received
        raw: String,
        /// Why it did not parse
        reason: String,
    },
}

impl<T> AnalysisOutcome<T> {
    /// Parses `reply` as JSON, tolerating a single surrounding code fence
    pub fn from_reply(reply: &str) -> Self
    where
        T: DeserializeOwned,
    {
        match serde_json::from_str(strip_code_fence(reply)) {
            Ok(value) => Self::Parsed(value),
            Err(e) => Self::Unparsed {
                raw: reply.to_string(),
                reason: e.to_string(),
            },
        }
    }

    /// True when the reply parsed
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    /// The parsed value, if any
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Unparsed { .. } => None,
        }
    }

    /// Converts into an `Option`, discarding the failure details
    pub fn into_parsed(self) -> Option<T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Unparsed { .. } => None,
        }
    }
}

impl<T: Default> AnalysisOutcome<T> {
    /// The parsed value, or `T::default()` for an unusable reply
    pub fn value_or_default(&self) -> T
    where
        T: Clone,
    {
        self.parsed().cloned().unwrap_or_default()
    }
}

impl<T: Default> Default for AnalysisOutcome<T> {
    fn default() -> Self {
        Self::Parsed(T::default())
    }
}

/// Removes one ```` ``` ```` / ```` ```json ```` fence wrapping the whole reply
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // the opening line is an info string ("json") only when it is one bare word
    match body.split_once('\n') {
        Some((info, inner)) if is_info_string(info) => inner.trim(),
        _ => body.trim(),
    }
}

fn is_info_string(line: &str) -> bool {
    let word = line.trim();
    word.is_empty()
        || word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Clone, PartialEq, Deserialize)]
    struct Flag {
        ok: bool,
    }

    #[test]
    fn test_plain_json() {
        let outcome: AnalysisOutcome<Flag> = AnalysisOutcome::from_reply(r#"{"ok": true}"#);
        assert_eq!(outcome, AnalysisOutcome::Parsed(Flag { ok: true }));
    }

    #[test]
    fn test_fenced_json() {
        let reply = "```json\n{\"ok\": true}\n```";
        let outcome: AnalysisOutcome<Flag> = AnalysisOutcome::from_reply(reply);
        assert!(outcome.is_parsed());
    }

    #[test]
    fn test_prose_is_unparsed() {
        let reply = "Sure! This file is an entry point.";
        let outcome: AnalysisOutcome<Flag> = AnalysisOutcome::from_reply(reply);
        match outcome {
            AnalysisOutcome::Unparsed { raw, reason } => {
                assert_eq!(raw, reply);
                assert!(!reason.is_empty());
            }
            AnalysisOutcome::Parsed(_) => panic!("prose must not parse"),
        }
    }

    #[test]
    fn test_value_or_default() {
        let bad: AnalysisOutcome<Flag> = AnalysisOutcome::from_reply("nope");
        assert_eq!(bad.value_or_default(), Flag::default());
    }

    #[test]
    fn test_strip_code_fence_leaves_unfenced_text() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```[1]```"), "[1]");
    }

    #[test]
    fn test_json_on_fence_line_is_kept() {
        let reply = "```{\"ok\": true}\n```";
        let outcome: AnalysisOutcome<Flag> = AnalysisOutcome::from_reply(reply);
        assert_eq!(outcome, AnalysisOutcome::Parsed(Flag { ok: true }));

        let multi = "```{\"ok\":\n false}\n```";
        assert_eq!(strip_code_fence(multi), "{\"ok\":\n false}");
    }
}
