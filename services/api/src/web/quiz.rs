//! services/api/src/web/quiz.rs
//!
//! The quiz generation endpoint.

use crate::web::protocol::{
    QuizErrorResponse, QuizMetadata, QuizOptionsDto, QuizRequest, QuizResponse, QuizResponseData,
};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use chrono::SecondsFormat;
use notes_quiz_core::domain::{Difficulty, GenerationOverrides, QuestionType};
use notes_quiz_core::quiz::QuizError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

type QuizFailure = (StatusCode, Json<QuizErrorResponse>);

/// Generate a quiz question grounded in the user's notes.
///
/// The last conversation message must come from the user. The response echoes the
/// conversation with one assistant turn appended.
#[utoipa::path(
    post,
    path = "/notes/generate-quiz",
    request_body = QuizRequest,
    responses(
        (status = 200, description = "Question generated", body = QuizResponse),
        (status = 400, description = "Malformed body or invalid conversation", body = QuizErrorResponse),
        (status = 404, description = "No notes available", body = QuizErrorResponse),
        (status = 500, description = "Notes could not be read", body = QuizErrorResponse),
        (status = 502, description = "The model failed or returned an unusable reply", body = QuizErrorResponse)
    )
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, QuizFailure> {
    let started = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected quiz request body: {}", rejection);
        failure(StatusCode::BAD_REQUEST, "Invalid JSON payload".to_string())
    })?;

    let overrides = parse_overrides(&request.options);
    let conversation = request.conversation.into_iter().map(Into::into).collect();

    let quiz = app_state
        .quiz_generator
        .generate_with_overrides(conversation, &request.note_ids, overrides)
        .await
        .map_err(|e| {
            error!(stage = e.stage(), "Quiz generation failed: {}", e);
            failure(status_for(&e), e.to_string())
        })?;

    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(processing_time_ms, "Quiz request served");

    Ok(Json(QuizResponse {
        success: true,
        data: QuizResponseData {
            conversation: quiz.conversation.into_iter().map(Into::into).collect(),
        },
        metadata: QuizMetadata {
            generated_at: quiz.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            tokens_used: quiz.tokens_used,
            processing_time_ms,
        },
    }))
}

/// Maps a pipeline failure onto the HTTP status reported to the client.
pub fn status_for(err: &QuizError) -> StatusCode {
    match err {
        QuizError::InvalidConversation(_) => StatusCode::BAD_REQUEST,
        QuizError::NoContentFound => StatusCode::NOT_FOUND,
        QuizError::NoteLookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        QuizError::ModelCallFailed(_)
        | QuizError::MalformedResponse(_)
        | QuizError::MissingRequiredField(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Reads the explicit generation options. Values that do not name a known difficulty or
/// question type are dropped so inference decides instead.
fn parse_overrides(options: &QuizOptionsDto) -> GenerationOverrides {
    let difficulty = options
        .difficulty
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| {
            let parsed = Difficulty::parse(value);
            if parsed.is_none() {
                warn!(value, "Ignoring unknown difficulty option");
            }
            parsed
        });

    let question_type = options
        .question_type
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| {
            let parsed = QuestionType::parse(value);
            if parsed.is_none() {
                warn!(value, "Ignoring unknown question type option");
            }
            parsed
        });

    GenerationOverrides {
        difficulty,
        question_type,
    }
}

fn failure(status: StatusCode, error: String) -> QuizFailure {
    (
        status,
        Json(QuizErrorResponse {
            success: false,
            error,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_quiz_core::ports::PortError;

    #[test]
    fn options_override_only_when_recognized() {
        let overrides = parse_overrides(&QuizOptionsDto {
            difficulty: Some("HARD".to_string()),
            question_type: Some("short-answer".to_string()),
        });

        assert_eq!(overrides.difficulty, Some(Difficulty::Hard));
        assert_eq!(overrides.question_type, None);
    }

    #[test]
    fn blank_options_are_ignored() {
        let overrides = parse_overrides(&QuizOptionsDto {
            difficulty: Some("  ".to_string()),
            question_type: None,
        });
        assert_eq!(overrides, GenerationOverrides::default());
    }

    #[test]
    fn failures_map_to_statuses() {
        assert_eq!(
            status_for(&QuizError::InvalidConversation("empty".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&QuizError::NoContentFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&QuizError::NoteLookup(PortError::Unexpected("db".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&QuizError::MissingRequiredField("type")),
            StatusCode::BAD_GATEWAY
        );
    }
}
