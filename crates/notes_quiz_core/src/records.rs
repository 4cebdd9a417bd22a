//! crates/notes_quiz_core/src/records.rs
//!
//! Business rules for the note and flashcard stores: input validation in front of the
//! repository ports.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Flashcard, Note};
use crate::ports::{FlashcardRepository, NoteRepository, PortError};

/// Longest content accepted for a note or flashcard, in characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Repository(String),
}

impl From<PortError> for RecordError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(message) => RecordError::NotFound(message),
            PortError::Unexpected(message) => RecordError::Repository(message),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Trims `content` and checks it is present and within the length limit.
pub fn validate_content(content: &str) -> RecordResult<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(RecordError::Validation("content is required".to_string()));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(RecordError::Validation(format!(
            "content cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed)
}

/// Validates the content of an update. `None` means the field was not sent.
pub fn validate_update(content: Option<&str>) -> RecordResult<&str> {
    let content = content.ok_or_else(|| {
        RecordError::Validation("content field must be provided for update".to_string())
    })?;
    if content.trim().is_empty() {
        return Err(RecordError::Validation("content cannot be empty".to_string()));
    }
    validate_content(content)
}

fn validate_id(kind: &str, id: i64) -> RecordResult<()> {
    if id <= 0 {
        return Err(RecordError::Validation(format!("invalid {} ID: {}", kind, id)));
    }
    Ok(())
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, content: &str) -> RecordResult<Note> {
        let content = validate_content(content)?;
        let note = self.repo.create_note(content).await?;
        info!(note_id = note.id, "Created note");
        Ok(note)
    }

    pub async fn get(&self, id: i64) -> RecordResult<Note> {
        validate_id("note", id)?;
        Ok(self.repo.get_note_by_id(id).await?)
    }

    pub async fn list(&self) -> RecordResult<Vec<Note>> {
        Ok(self.repo.get_all_notes().await?)
    }

    pub async fn update(&self, id: i64, content: Option<&str>) -> RecordResult<Note> {
        validate_id("note", id)?;
        let content = validate_update(content)?;
        let note = self.repo.update_note(id, content).await?;
        info!(note_id = note.id, "Updated note");
        Ok(note)
    }

    pub async fn delete(&self, id: i64) -> RecordResult<()> {
        validate_id("note", id)?;
        self.repo.delete_note(id).await?;
        info!(note_id = id, "Deleted note");
        Ok(())
    }
}

#[derive(Clone)]
pub struct FlashcardService {
    repo: Arc<dyn FlashcardRepository>,
}

impl FlashcardService {
    pub fn new(repo: Arc<dyn FlashcardRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, content: &str) -> RecordResult<Flashcard> {
        let content = validate_content(content)?;
        let flashcard = self.repo.create_flashcard(content).await?;
        info!(flashcard_id = flashcard.id, "Created flashcard");
        Ok(flashcard)
    }

    pub async fn get(&self, id: i64) -> RecordResult<Flashcard> {
        validate_id("flashcard", id)?;
        Ok(self.repo.get_flashcard_by_id(id).await?)
    }

    pub async fn list(&self) -> RecordResult<Vec<Flashcard>> {
        Ok(self.repo.get_all_flashcards().await?)
    }

    pub async fn update(&self, id: i64, content: Option<&str>) -> RecordResult<Flashcard> {
        validate_id("flashcard", id)?;
        let content = validate_update(content)?;
        let flashcard = self.repo.update_flashcard(id, content).await?;
        info!(flashcard_id = flashcard.id, "Updated flashcard");
        Ok(flashcard)
    }

    pub async fn delete(&self, id: i64) -> RecordResult<()> {
        validate_id("flashcard", id)?;
        self.repo.delete_flashcard(id).await?;
        info!(flashcard_id = id, "Deleted flashcard");
        Ok(())
    }
}
