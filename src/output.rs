//! Values produced by a processing run.

use crate::error::GenerationError;
use crate::pipeline::name::InferredName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text of a single page: its 1-indexed number and the page's text items
/// joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_num: usize,
    pub text: String,
}

impl PageText {
    pub fn new(page_num: usize, text: impl Into<String>) -> Self {
        Self {
            page_num,
            text: text.into(),
        }
    }
}

/// The whole document as one string: every page followed by `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentText(String);

impl DocumentText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DocumentText {
    fn from(s: String) -> Self {
        DocumentText(s)
    }
}

impl AsRef<str> for DocumentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The compliment delivered to the display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplimentResult {
    /// The backend produced this text.
    Generated { text: String },
    /// The backend failed; `text` is the configured fallback.
    Fallback {
        text: String,
        error: GenerationError,
    },
}

impl ComplimentResult {
    /// The text to show, whichever way it was obtained.
    pub fn text(&self) -> &str {
        match self {
            ComplimentResult::Generated { text } | ComplimentResult::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ComplimentResult::Fallback { .. })
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            ComplimentResult::Generated { .. } => None,
            ComplimentResult::Fallback { error, .. } => Some(error),
        }
    }
}

/// Per-step timings and sizes for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Size of the loaded document.
    pub document_bytes: usize,
    /// Pages extracted.
    pub page_count: usize,
    /// Characters of assembled text.
    pub char_count: usize,
    pub load_duration_ms: u64,
    pub extract_duration_ms: u64,
    pub generate_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a successful-extraction run hands to the display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: u64,
    pub compliment: ComplimentResult,
    pub name: Option<InferredName>,
    pub document: DocumentText,
    pub stats: RunStats,
}

impl RunReport {
    /// The first name, if one was inferred.
    pub fn first_name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.first_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_exposes_text_and_error() {
        let c = ComplimentResult::Fallback {
            text: "fallback".into(),
            error: GenerationError::Timeout { secs: 5 },
        };
        assert_eq!(c.text(), "fallback");
        assert!(c.is_fallback());
        assert!(c.error().is_some());
    }

    #[test]
    fn compliment_serialises_with_kind_tag() {
        let c = ComplimentResult::Generated {
            text: "Parabéns!".into(),
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "generated");
        assert_eq!(json["text"], "Parabéns!");
    }

    #[test]
    fn char_count_counts_characters() {
        let d = DocumentText::from("João\n".to_string());
        assert_eq!(d.char_count(), 5);
        assert_eq!(d.as_str().len(), 6);
    }
}
