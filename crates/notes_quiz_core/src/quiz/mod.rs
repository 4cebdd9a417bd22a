//! crates/notes_quiz_core/src/quiz/mod.rs
//!
//! The quiz generation pipeline. `QuizGenerator` validates the conversation, resolves the
//! grounding notes, infers generation parameters from the last user message, prompts the
//! model once, and appends the extracted question to the conversation as a new assistant
//! turn. Stages run strictly in sequence; the first failure aborts the call.

pub mod content;
pub mod error;
pub mod extract;
pub mod invoker;
pub mod params;
pub mod prompt;

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::{ConversationTurn, GenerationOverrides, Role};
use crate::ports::{GenerativeModel, NoteRepository};

pub use content::ContentAggregator;
pub use error::{QuizError, QuizResult};
pub use invoker::{ModelInvoker, QUIZ_TEMPERATURE};
pub use prompt::PromptTemplates;

/// Content of every assistant turn carrying a generated question.
pub const ASSISTANT_INTRO: &str = "Here's a quiz question based on your notes:";

/// The result of one successful generation.
#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    /// The input conversation with the new assistant turn appended.
    pub conversation: Vec<ConversationTurn>,
    pub generated_at: DateTime<Utc>,
    pub processing_time: Duration,
    /// Token usage is not reported by the model port, so this is always `None`.
    pub tokens_used: Option<u32>,
}

pub struct QuizGenerator {
    content: ContentAggregator,
    invoker: ModelInvoker,
    templates: PromptTemplates,
}

impl QuizGenerator {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        model: Arc<dyn GenerativeModel>,
        templates: PromptTemplates,
    ) -> Self {
        Self {
            content: ContentAggregator::new(notes),
            invoker: ModelInvoker::new(model),
            templates,
        }
    }

    pub async fn generate(
        &self,
        conversation: Vec<ConversationTurn>,
        note_ids: &[i64],
    ) -> QuizResult<GeneratedQuiz> {
        self.generate_with_overrides(conversation, note_ids, GenerationOverrides::default())
            .await
    }

    /// Like [`QuizGenerator::generate`], with caller-chosen parameters taking precedence
    /// over the ones inferred from the conversation.
    pub async fn generate_with_overrides(
        &self,
        mut conversation: Vec<ConversationTurn>,
        note_ids: &[i64],
        overrides: GenerationOverrides,
    ) -> QuizResult<GeneratedQuiz> {
        let started = Instant::now();
        info!(
            turns = conversation.len(),
            note_ids = note_ids.len(),
            "Starting quiz generation"
        );

        let request = validate_conversation(&conversation).inspect_err(|e| {
            error!("Quiz generation rejected: {}", e);
        })?;

        let grounding = self.content.resolve(note_ids).await?;

        let params = overrides.apply(params::infer(request));
        let prompt = self.templates.build(&grounding, &params);
        info!(
            difficulty = %params.difficulty,
            question_type = %params.question_type,
            prompt_chars = prompt.len(),
            "Prepared quiz prompt"
        );

        let completion = self.invoker.invoke(&prompt).await?;
        let question = extract::extract(&completion, note_ids)?;

        info!(
            question_id = %question.id,
            question_type = %question.question_type,
            "Quiz generation completed"
        );
        conversation.push(ConversationTurn::assistant(ASSISTANT_INTRO, question));

        Ok(GeneratedQuiz {
            conversation,
            generated_at: Utc::now(),
            processing_time: started.elapsed(),
            tokens_used: None,
        })
    }
}

/// Checks the conversation can be answered and returns the last user message.
pub fn validate_conversation(conversation: &[ConversationTurn]) -> QuizResult<&str> {
    let last = conversation.last().ok_or_else(|| {
        QuizError::InvalidConversation("conversation cannot be empty".to_string())
    })?;

    if last.role != Role::User {
        return Err(QuizError::InvalidConversation(format!(
            "last message must be from user, got role: {}",
            last.role
        )));
    }

    if last.content.trim().is_empty() {
        return Err(QuizError::InvalidConversation(
            "user message cannot be empty".to_string(),
        ));
    }

    Ok(&last.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, QuestionType};
    use crate::testing::{InMemoryNoteRepository, ScriptedModel};

    const ESSAY_REPLY: &str = r#"Sure! Here is your question:
{"question":"Why does Rust forbid two mutable borrows?","type":"essay","explanation":"Aliasing rules.","difficulty":"hard"}
Good luck."#;

    async fn notes() -> Arc<InMemoryNoteRepository> {
        let repo = Arc::new(InMemoryNoteRepository::new());
        repo.create_note("Ownership moves values").await.unwrap();
        repo.create_note("Only one mutable borrow at a time").await.unwrap();
        repo
    }

    fn generator(notes: Arc<InMemoryNoteRepository>, model: Arc<ScriptedModel>) -> QuizGenerator {
        QuizGenerator::new(notes, model, PromptTemplates::default())
    }

    #[tokio::test]
    async fn appends_assistant_turn_with_question() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let quiz = generator(notes().await, model.clone())
            .generate(vec![ConversationTurn::user("Give me a hard essay question")], &[])
            .await
            .unwrap();

        assert_eq!(quiz.conversation.len(), 2);
        let turn = &quiz.conversation[1];
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, ASSISTANT_INTRO);

        let question = turn.question.as_ref().unwrap();
        assert_eq!(question.difficulty, "hard");
        assert_eq!(question.question_type, "essay");
        assert!(question.based_on_notes.is_empty());
        assert_eq!(quiz.tokens_used, None);

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        let (prompt, temperature) = &calls[0];
        assert_eq!(*temperature, QUIZ_TEMPERATURE);
        assert!(prompt.contains("Note 2: Only one mutable borrow at a time\n\n---\n\nNote 1: Ownership moves values"));
        assert!(prompt.contains("Make it hard difficulty and format it as essay."));
    }

    #[tokio::test]
    async fn keeps_earlier_turns_in_order() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let history = vec![
            ConversationTurn::user("first"),
            ConversationTurn {
                role: Role::Assistant,
                content: "earlier reply".to_string(),
                question: None,
            },
            ConversationTurn::user("another, please"),
        ];

        let quiz = generator(notes().await, model)
            .generate(history.clone(), &[1])
            .await
            .unwrap();

        assert_eq!(&quiz.conversation[..3], &history[..]);
        assert_eq!(
            quiz.conversation[3].question.as_ref().unwrap().based_on_notes,
            vec![1]
        );
    }

    #[tokio::test]
    async fn rejects_empty_conversation() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let err = generator(notes().await, model.clone())
            .generate(vec![], &[])
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::InvalidConversation(_)));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn rejects_conversation_ending_with_assistant() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let conversation = vec![
            ConversationTurn::user("hi"),
            ConversationTurn {
                role: Role::Assistant,
                content: "hello".to_string(),
                question: None,
            },
        ];

        let err = generator(notes().await, model)
            .generate(conversation, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidConversation(_)));
    }

    #[tokio::test]
    async fn rejects_blank_user_message() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let err = generator(notes().await, model)
            .generate(vec![ConversationTurn::user("  \n\t")], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidConversation(_)));
    }

    #[tokio::test]
    async fn no_content_stops_before_the_model() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let err = generator(notes().await, model.clone())
            .generate(vec![ConversationTurn::user("quiz me")], &[7, 8])
            .await
            .unwrap_err();

        assert!(matches!(err, QuizError::NoContentFound));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn model_failure_aborts_generation() {
        let model = Arc::new(ScriptedModel::failing("upstream unavailable"));
        let err = generator(notes().await, model)
            .generate(vec![ConversationTurn::user("quiz me")], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::ModelCallFailed(_)));
    }

    #[tokio::test]
    async fn unparseable_reply_aborts_generation() {
        let model = Arc::new(ScriptedModel::replying("I cannot help with that."));
        let err = generator(notes().await, model)
            .generate(vec![ConversationTurn::user("quiz me")], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, QuizError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn overrides_take_precedence_over_inference() {
        let model = Arc::new(ScriptedModel::replying(ESSAY_REPLY));
        let overrides = GenerationOverrides {
            difficulty: Some(Difficulty::Easy),
            question_type: Some(QuestionType::TrueFalse),
        };

        generator(notes().await, model.clone())
            .generate_with_overrides(
                vec![ConversationTurn::user("Give me a hard essay question")],
                &[],
                overrides,
            )
            .await
            .unwrap();

        let (prompt, _) = &model.calls()[0];
        assert!(prompt.contains("Make it easy difficulty and format it as true-false."));
    }

    #[test]
    fn validation_returns_last_user_message() {
        let conversation = vec![ConversationTurn::user("quiz me on lifetimes")];
        assert_eq!(
            validate_conversation(&conversation).unwrap(),
            "quiz me on lifetimes"
        );
    }
}
