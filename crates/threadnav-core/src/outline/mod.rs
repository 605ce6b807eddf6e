//! Reply outline extraction.
//!
//! A reply's markdown is reduced to its heading sequence ([`parse_headings`]) and
//! then folded into an entry label plus a two-level, parent-linked section list
//! ([`build_outline`]).

use serde::Serialize;

use crate::models::NavSection;

mod builder;
mod parser;

pub use builder::{build_outline, build_outline_with_ids, clean_heading_label};
pub use parser::parse_headings;

/// One heading occurrence in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Result of one extraction pass over a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    /// Cleaned text of the first qualifying level-2 heading; empty when none qualified.
    pub entry_label: String,
    pub sections: Vec<NavSection>,
    /// Parent id handed to subsections that appear before any real section.
    /// Never persisted.
    #[serde(skip)]
    pub synthetic_parent_id: Option<String>,
}

impl Outline {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Parses `markdown` and builds its outline in one call.
pub fn extract_outline(markdown: &str, navigator_id: &str, assistant_message_id: &str) -> Outline {
    let headings = parse_headings(markdown);
    let outline = build_outline(&headings, navigator_id, assistant_message_id);
    tracing::debug!(
        assistant_message_id,
        headings = headings.len(),
        sections = outline.sections.len(),
        entry_label = %outline.entry_label,
        "outline extracted"
    );
    outline
}
