use std::collections::HashMap;

use crate::error::RepositoryError;
use crate::models::{NavEntry, NavEntryWithSections, NavSection, Navigator, NavigatorTree};

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Durable storage for navigators, entries and sections.
///
/// Entry and section writes are separate calls with no transaction spanning
/// both; a failure in between leaves an entry without sections.
pub trait NavigationRepository: Send + Sync {
    fn create_navigator(&self, navigator: &Navigator) -> RepositoryResult<()>;

    fn get_navigator_by_chat_id(&self, chat_id: &str) -> RepositoryResult<Option<Navigator>>;

    /// Entries of one navigator, oldest first.
    fn list_entries(&self, navigator_id: &str) -> RepositoryResult<Vec<NavEntry>>;

    /// Sections of one navigator ordered by `(assistant_message_id, order_index)`.
    fn list_sections(&self, navigator_id: &str) -> RepositoryResult<Vec<NavSection>>;

    fn insert_entry(&self, entry: &NavEntry) -> RepositoryResult<()>;

    /// Inserts every section or none; on failure names the section that failed.
    fn batch_insert_sections(&self, sections: &[NavSection]) -> RepositoryResult<()>;

    fn get_navigator_and_entries_by_chat_id(
        &self,
        chat_id: &str,
    ) -> RepositoryResult<Option<NavigatorTree>> {
        let Some(navigator) = self.get_navigator_by_chat_id(chat_id)? else {
            return Ok(None);
        };
        let entries = self.list_entries(&navigator.id)?;
        let sections = self.list_sections(&navigator.id)?;
        Ok(Some(assemble_tree(navigator, entries, sections)))
    }
}

/// Re-attaches sections to their entries by `assistant_message_id`.
///
/// Section order within each reply is preserved; entries without sections get
/// an empty list and sections whose reply has no entry are dropped.
#[must_use]
pub fn assemble_tree(
    navigator: Navigator,
    entries: Vec<NavEntry>,
    sections: Vec<NavSection>,
) -> NavigatorTree {
    let mut by_reply: HashMap<String, Vec<NavSection>> = HashMap::new();
    for section in sections {
        by_reply
            .entry(section.assistant_message_id.clone())
            .or_default()
            .push(section);
    }

    let entries = entries
        .into_iter()
        .map(|entry| {
            let sections = by_reply
                .remove(&entry.assistant_message_id)
                .unwrap_or_default();
            NavEntryWithSections { entry, sections }
        })
        .collect();

    NavigatorTree { navigator, entries }
}
