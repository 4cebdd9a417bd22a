//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use notes_quiz_core::ports::{FlashcardRepository, GenerativeModel, NoteRepository};
use notes_quiz_core::quiz::{PromptTemplates, QuizGenerator};
use notes_quiz_core::records::{FlashcardService, NoteService};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
    pub flashcards: FlashcardService,
    pub quiz_generator: Arc<QuizGenerator>,
}

impl AppState {
    /// Wires the services on top of the given port implementations.
    pub fn new(
        note_repo: Arc<dyn NoteRepository>,
        flashcard_repo: Arc<dyn FlashcardRepository>,
        model: Arc<dyn GenerativeModel>,
        templates: PromptTemplates,
    ) -> Self {
        Self {
            notes: NoteService::new(note_repo.clone()),
            flashcards: FlashcardService::new(flashcard_repo),
            quiz_generator: Arc::new(QuizGenerator::new(note_repo, model, templates)),
        }
    }
}
