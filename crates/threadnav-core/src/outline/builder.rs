use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{NavSection, SECTION_LEVEL, SUBSECTION_LEVEL, reply_anchor};

use super::{Heading, Outline};

/// Builds a reply outline with random v4 identifiers.
#[must_use]
pub fn build_outline(
    headings: &[Heading],
    navigator_id: &str,
    assistant_message_id: &str,
) -> Outline {
    build_outline_with_ids(headings, navigator_id, assistant_message_id, || {
        Uuid::new_v4().to_string()
    })
}

/// Builds a reply outline, drawing section and synthetic-ancestor ids from `next_id`.
///
/// Only level-2 and level-3 headings take part; everything else is dropped
/// before counting. The first level-2 heading with a non-empty label becomes the
/// entry label instead of a section, and headings seen before it are dropped
/// while still advancing the order index.
pub fn build_outline_with_ids(
    headings: &[Heading],
    navigator_id: &str,
    assistant_message_id: &str,
    next_id: impl FnMut() -> String,
) -> Outline {
    let mut state = OutlineState::new(navigator_id, assistant_message_id, next_id);
    for heading in headings
        .iter()
        .filter(|heading| is_outline_level(heading.level))
    {
        state.push(heading);
    }
    state.finish()
}

/// Strips a leading `<digits>.` list marker and the whitespace after it.
#[must_use]
pub fn clean_heading_label(raw: &str) -> String {
    let digits = raw.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0
        && let Some(rest) = raw[digits..].strip_prefix('.')
    {
        return rest
            .trim_start_matches(|c: char| c.is_ascii_whitespace())
            .to_string();
    }
    raw.to_string()
}

const fn is_outline_level(level: u8) -> bool {
    level == SECTION_LEVEL || level == SUBSECTION_LEVEL
}

struct OutlineState<'a, F> {
    navigator_id: &'a str,
    assistant_message_id: &'a str,
    anchor: String,
    stamped_at: DateTime<Utc>,
    next_id: F,
    order_index: u32,
    last_section_id: Option<String>,
    entry_label: String,
    got_label: bool,
    synthetic_parent_id: Option<String>,
    sections: Vec<NavSection>,
}

impl<'a, F> OutlineState<'a, F>
where
    F: FnMut() -> String,
{
    fn new(navigator_id: &'a str, assistant_message_id: &'a str, next_id: F) -> Self {
        Self {
            navigator_id,
            assistant_message_id,
            anchor: reply_anchor(assistant_message_id),
            stamped_at: Utc::now(),
            next_id,
            order_index: 0,
            last_section_id: None,
            entry_label: String::new(),
            got_label: false,
            synthetic_parent_id: None,
            sections: Vec::new(),
        }
    }

    fn push(&mut self, heading: &Heading) {
        let label = clean_heading_label(&heading.text);
        self.order_index += 1;

        if !self.got_label && heading.level == SECTION_LEVEL && !label.is_empty() {
            self.entry_label = label;
            self.got_label = true;
            let synthetic = (self.next_id)();
            self.last_section_id = Some(synthetic.clone());
            self.synthetic_parent_id = Some(synthetic);
            return;
        }

        if self.entry_label.is_empty() {
            return;
        }

        let id = (self.next_id)();
        let parent_id = if heading.level == SECTION_LEVEL {
            self.last_section_id = Some(id.clone());
            None
        } else {
            self.last_section_id.clone()
        };

        self.sections.push(NavSection {
            id,
            navigator_id: self.navigator_id.to_string(),
            parent_id,
            assistant_message_id: self.assistant_message_id.to_string(),
            label,
            anchor: self.anchor.clone(),
            level: heading.level,
            order_index: self.order_index,
            created_at: self.stamped_at,
            updated_at: self.stamped_at,
        });
    }

    fn finish(self) -> Outline {
        Outline {
            entry_label: self.entry_label,
            sections: self.sections,
            synthetic_parent_id: self.synthetic_parent_id,
        }
    }
}
