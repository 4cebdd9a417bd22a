//! crates/notes_quiz_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or wire format.

use chrono::{DateTime, Utc};
use std::fmt;

/// A study note, the grounding material questions are generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A flashcard. Stored with the same rules as notes but never used for grounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message exchanged between the user and the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub question: Option<QuestionRecord>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            question: None,
        }
    }

    pub fn assistant(content: impl Into<String>, question: QuestionRecord) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            question: Some(question),
        }
    }
}

/// A generated quiz question.
///
/// `question_type` and `difficulty` hold whatever the model wrote. Use
/// [`QuestionRecord::kind`] and [`QuestionRecord::level`] to classify them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub question_type: String,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub explanation: Option<String>,
    pub difficulty: String,
    pub based_on_notes: Vec<i64>,
}

impl QuestionRecord {
    pub fn kind(&self) -> Option<QuestionType> {
        QuestionType::parse(&self.question_type)
    }

    pub fn level(&self) -> Option<Difficulty> {
        Difficulty::parse(&self.difficulty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Case-insensitive parse of the canonical names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    MultipleChoice,
    Essay,
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Essay => "essay",
            QuestionType::TrueFalse => "true-false",
        }
    }

    /// Case-insensitive parse of the canonical names.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" => Some(QuestionType::MultipleChoice),
            "essay" => Some(QuestionType::Essay),
            "true-false" => Some(QuestionType::TrueFalse),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters steering a single generation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParameters {
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
}

/// Caller-supplied values that take precedence over inferred parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOverrides {
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
}

impl GenerationOverrides {
    pub fn apply(&self, inferred: GenerationParameters) -> GenerationParameters {
        GenerationParameters {
            difficulty: self.difficulty.unwrap_or(inferred.difficulty),
            question_type: self.question_type.unwrap_or(inferred.question_type),
        }
    }
}
