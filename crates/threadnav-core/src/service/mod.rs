use chrono::Utc;
use uuid::Uuid;

use crate::error::{NavError, RepositoryError, Result};
use crate::models::{NavEntry, Navigator, NavigatorTree};
use crate::outline::{Outline, extract_outline};
use crate::repository::NavigationRepository;

const PREVIEW_NAVIGATOR_ID: &str = "preview";

/// Identifiers and text of one assistant reply to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddEntryRequest {
    pub navigator_id: String,
    pub chat_id: String,
    pub assistant_message_id: String,
    pub user_message_id: String,
    pub reply_text: String,
}

/// Turns replies into navigation entries and reads navigators back.
#[derive(Debug, Clone)]
pub struct NavigationService<R> {
    repo: R,
}

impl<R: NavigationRepository> NavigationService<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    pub const fn repository(&self) -> &R {
        &self.repo
    }

    pub fn create_navigator(&self, chat_id: &str, chat_title: &str) -> Result<Navigator> {
        let chat_id = require_non_blank("chatId", chat_id)?;
        if self.repo.get_navigator_by_chat_id(chat_id)?.is_some() {
            return Err(NavError::Conflict(format!(
                "navigator already exists for chat {chat_id}"
            )));
        }

        let navigator = Navigator {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id.to_string(),
            chat_title: chat_title.to_string(),
            updated_at: Utc::now(),
        };
        self.repo.create_navigator(&navigator)?;
        tracing::info!(navigator_id = %navigator.id, chat_id, "navigator created");
        Ok(navigator)
    }

    /// Returns the chat's navigator, creating it on first reference.
    pub fn ensure_navigator(&self, chat_id: &str, chat_title: &str) -> Result<Navigator> {
        let chat_id = require_non_blank("chatId", chat_id)?;
        if let Some(existing) = self.repo.get_navigator_by_chat_id(chat_id)? {
            return Ok(existing);
        }
        match self.create_navigator(chat_id, chat_title) {
            Ok(navigator) => Ok(navigator),
            // Lost a creation race; the winner's row is the navigator.
            Err(NavError::Conflict(_) | NavError::Repository(RepositoryError::Conflict(_))) => self
                .repo
                .get_navigator_by_chat_id(chat_id)?
                .ok_or_else(|| NavError::NotFound(format!("navigator for chat {chat_id}"))),
            Err(err) => Err(err),
        }
    }

    /// Navigator plus every entry with its sections re-attached.
    pub fn get_navigator(&self, chat_id: &str) -> Result<NavigatorTree> {
        self.repo
            .get_navigator_and_entries_by_chat_id(chat_id)?
            .ok_or_else(|| NavError::NotFound(format!("navigator for chat {chat_id}")))
    }

    /// Extracts the reply outline and persists the entry, then its sections.
    ///
    /// The two writes are not atomic together: if the section batch fails the
    /// entry stays persisted with no sections and the repository error is
    /// returned unchanged.
    pub fn add_entry(&self, request: &AddEntryRequest) -> Result<NavEntry> {
        let assistant_message_id =
            require_non_blank("assistantMessageId", &request.assistant_message_id)?;
        let outline = extract_outline(
            &request.reply_text,
            &request.navigator_id,
            assistant_message_id,
        );
        if outline.is_empty() {
            tracing::warn!(
                assistant_message_id,
                chat_id = %request.chat_id,
                "reply has no navigable sections; entry not created"
            );
            return Err(NavError::ExtractionEmpty {
                assistant_message_id: assistant_message_id.to_string(),
            });
        }

        let now = Utc::now();
        let entry = NavEntry {
            id: Uuid::new_v4().to_string(),
            navigator_id: request.navigator_id.clone(),
            chat_id: request.chat_id.clone(),
            assistant_message_id: assistant_message_id.to_string(),
            user_message_id: request.user_message_id.clone(),
            label: outline.entry_label,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert_entry(&entry)?;

        if let Err(err) = self.repo.batch_insert_sections(&outline.sections) {
            tracing::warn!(
                entry_id = %entry.id,
                assistant_message_id,
                error = %err,
                "entry persisted without sections"
            );
            return Err(err.into());
        }

        tracing::info!(
            entry_id = %entry.id,
            navigator_id = %entry.navigator_id,
            assistant_message_id,
            sections = outline.sections.len(),
            "navigation entry added"
        );
        Ok(entry)
    }

    /// Resolves the chat's navigator and adds the reply to it.
    pub fn add_entry_for_chat(
        &self,
        chat_id: &str,
        assistant_message_id: &str,
        user_message_id: &str,
        reply_text: &str,
    ) -> Result<NavEntry> {
        let navigator = self
            .repo
            .get_navigator_by_chat_id(chat_id)?
            .ok_or_else(|| NavError::NotFound(format!("navigator for chat {chat_id}")))?;
        self.add_entry(&AddEntryRequest {
            navigator_id: navigator.id,
            chat_id: navigator.chat_id,
            assistant_message_id: assistant_message_id.to_string(),
            user_message_id: user_message_id.to_string(),
            reply_text: reply_text.to_string(),
        })
    }

    /// Outline of `reply_text` without touching storage.
    #[must_use]
    pub fn preview_outline(&self, reply_text: &str, assistant_message_id: &str) -> Outline {
        extract_outline(reply_text, PREVIEW_NAVIGATOR_ID, assistant_message_id)
    }
}

fn require_non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(NavError::Validation(format!("{field} must not be blank")));
    }
    Ok(value)
}
