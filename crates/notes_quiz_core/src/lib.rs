pub mod domain;
pub mod ports;
pub mod quiz;
pub mod records;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use domain::{
    ConversationTurn, Difficulty, Flashcard, GenerationOverrides, GenerationParameters, Note,
    QuestionRecord, QuestionType, Role,
};
pub use ports::{FlashcardRepository, GenerativeModel, NoteRepository, PortError, PortResult};
pub use quiz::{GeneratedQuiz, PromptTemplates, QuizError, QuizGenerator};
pub use records::{FlashcardService, NoteService, RecordError};
