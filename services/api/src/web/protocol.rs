//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged with HTTP clients and their mapping onto the
//! core domain types. Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use notes_quiz_core::domain::{ConversationTurn, Flashcard, Note, QuestionRecord, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Conversation Payloads
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    User,
    Assistant,
}

/// One conversation message. `question` is only present on generated assistant turns.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub role: RoleDto,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub based_on_notes: Vec<i64>,
}

impl From<RoleDto> for Role {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::User => Role::User,
            RoleDto::Assistant => Role::Assistant,
        }
    }
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::User => RoleDto::User,
            Role::Assistant => RoleDto::Assistant,
        }
    }
}

impl From<QuestionDto> for QuestionRecord {
    fn from(dto: QuestionDto) -> Self {
        QuestionRecord {
            id: dto.id,
            text: dto.text,
            question_type: dto.question_type,
            options: dto.options,
            correct_answer: dto.correct_answer,
            explanation: dto.explanation,
            difficulty: dto.difficulty,
            based_on_notes: dto.based_on_notes,
        }
    }
}

impl From<QuestionRecord> for QuestionDto {
    fn from(record: QuestionRecord) -> Self {
        QuestionDto {
            id: record.id,
            text: record.text,
            question_type: record.question_type,
            options: record.options,
            correct_answer: record.correct_answer,
            explanation: record.explanation,
            difficulty: record.difficulty,
            based_on_notes: record.based_on_notes,
        }
    }
}

impl From<MessageDto> for ConversationTurn {
    fn from(dto: MessageDto) -> Self {
        ConversationTurn {
            role: dto.role.into(),
            content: dto.content,
            question: dto.question.map(Into::into),
        }
    }
}

impl From<ConversationTurn> for MessageDto {
    fn from(turn: ConversationTurn) -> Self {
        MessageDto {
            role: turn.role.into(),
            content: turn.content,
            question: turn.question.map(Into::into),
        }
    }
}

//=========================================================================================
// Quiz Generation Payloads
//=========================================================================================

/// Explicit generation parameters. Unrecognized values are ignored.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptionsDto {
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default)]
    pub note_ids: Vec<i64>,
    #[serde(default)]
    pub conversation: Vec<MessageDto>,
    #[serde(default)]
    pub options: QuizOptionsDto,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub success: bool,
    pub data: QuizResponseData,
    pub metadata: QuizMetadata,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponseData {
    pub conversation: Vec<MessageDto>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    /// RFC 3339 timestamp of the generation.
    pub generated_at: String,
    /// Always `null`: token usage is not measured.
    pub tokens_used: Option<u32>,
    pub processing_time_ms: u64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct QuizErrorResponse {
    pub success: bool,
    pub error: String,
}

//=========================================================================================
// Note and Flashcard Payloads
//=========================================================================================

/// A stored note or flashcard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for RecordDto {
    fn from(note: Note) -> Self {
        RecordDto {
            id: note.id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

impl From<Flashcard> for RecordDto {
    fn from(card: Flashcard) -> Self {
        RecordDto {
            id: card.id,
            content: card.content,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct CreateRecordRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct UpdateRecordRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
