//! crates/notes_quiz_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{Flashcard, Note};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create_note(&self, content: &str) -> PortResult<Note>;

    /// Returns `PortError::NotFound` when no note has the given id.
    async fn get_note_by_id(&self, id: i64) -> PortResult<Note>;

    /// All notes, newest first.
    async fn get_all_notes(&self) -> PortResult<Vec<Note>>;

    async fn update_note(&self, id: i64, content: &str) -> PortResult<Note>;

    async fn delete_note(&self, id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    async fn create_flashcard(&self, content: &str) -> PortResult<Flashcard>;

    async fn get_flashcard_by_id(&self, id: i64) -> PortResult<Flashcard>;

    /// All flashcards, newest first.
    async fn get_all_flashcards(&self) -> PortResult<Vec<Flashcard>>;

    async fn update_flashcard(&self, id: i64, content: &str) -> PortResult<Flashcard>;

    async fn delete_flashcard(&self, id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Completes a single prompt at the given sampling temperature.
    async fn complete(&self, prompt: &str, temperature: f32) -> PortResult<String>;
}
