use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heading depth rendered as a top-level section of a reply.
pub const SECTION_LEVEL: u8 = 2;
/// Heading depth rendered as a subsection nested under the preceding section.
pub const SUBSECTION_LEVEL: u8 = 3;

const ANCHOR_PREFIX: &str = "a--";

/// Anchor shared by every section of one reply; the UI scrolls to the reply, not the heading.
#[must_use]
pub fn reply_anchor(assistant_message_id: &str) -> String {
    format!("{ANCHOR_PREFIX}{assistant_message_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigator {
    pub id: String,
    pub chat_id: String,
    pub chat_title: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    pub id: String,
    pub navigator_id: String,
    pub chat_id: String,
    pub assistant_message_id: String,
    pub user_message_id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSection {
    pub id: String,
    pub navigator_id: String,
    pub parent_id: Option<String>,
    pub assistant_message_id: String,
    pub label: String,
    pub anchor: String,
    pub level: u8,
    pub order_index: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NavSection {
    #[must_use]
    pub const fn is_subsection(&self) -> bool {
        self.level == SUBSECTION_LEVEL
    }
}

/// An entry with its outline re-attached, as returned by the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntryWithSections {
    #[serde(flatten)]
    pub entry: NavEntry,
    pub sections: Vec<NavSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatorTree {
    pub navigator: Navigator,
    pub entries: Vec<NavEntryWithSections>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_anchor_prefixes_message_id() {
        assert_eq!(reply_anchor("m1"), "a--m1");
    }

    #[test]
    fn entry_with_sections_serializes_flat_camel_case() {
        let now = Utc::now();
        let value = serde_json::to_value(NavEntryWithSections {
            entry: NavEntry {
                id: "e1".to_string(),
                navigator_id: "n1".to_string(),
                chat_id: "c1".to_string(),
                assistant_message_id: "m1".to_string(),
                user_message_id: "u1".to_string(),
                label: "Intro".to_string(),
                created_at: now,
                updated_at: now,
            },
            sections: Vec::new(),
        })
        .expect("serialize entry");

        assert_eq!(value["assistantMessageId"], "m1");
        assert_eq!(value["label"], "Intro");
        assert_eq!(value["sections"], serde_json::json!([]));
        assert!(value.get("entry").is_none());
    }
}
