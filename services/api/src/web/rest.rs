//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the note and flashcard endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    CreateRecordRequest, ErrorResponse, MessageDto, QuestionDto, QuizErrorResponse,
    QuizMetadata, QuizOptionsDto, QuizRequest, QuizResponse, QuizResponseData, RecordDto,
    RoleDto, UpdateRecordRequest,
};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use notes_quiz_core::records::RecordError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        crate::web::quiz::generate_quiz_handler,
        list_notes_handler,
        create_note_handler,
        get_note_handler,
        update_note_handler,
        delete_note_handler,
        list_flashcards_handler,
        create_flashcard_handler,
        get_flashcard_handler,
        update_flashcard_handler,
        delete_flashcard_handler,
    ),
    components(
        schemas(
            HealthResponse,
            QuizRequest,
            QuizOptionsDto,
            QuizResponse,
            QuizResponseData,
            QuizMetadata,
            QuizErrorResponse,
            MessageDto,
            QuestionDto,
            RoleDto,
            RecordDto,
            CreateRecordRequest,
            UpdateRecordRequest,
            ErrorResponse
        )
    ),
    tags(
        (name = "Notes Quiz API", description = "Note storage and quiz generation grounded in stored notes.")
    )
)]
pub struct ApiDoc;

/// The OpenAPI document with the service name and crate version filled in.
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Notes Quiz API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}

/// Serves the generated OpenAPI document.
pub async fn openapi_handler() -> impl IntoResponse {
    Json(openapi_document())
}

//=========================================================================================
// Health
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

//=========================================================================================
// Error Mapping
//=========================================================================================

type RecordFailure = (StatusCode, Json<ErrorResponse>);

fn record_failure(err: RecordError) -> RecordFailure {
    let status = match &err {
        RecordError::Validation(_) => StatusCode::BAD_REQUEST,
        RecordError::NotFound(_) => StatusCode::NOT_FOUND,
        RecordError::Repository(_) => {
            error!("Record store failure: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(error: &str) -> RecordFailure {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RecordFailure> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection);
        bad_request("Invalid JSON payload")
    })
}

fn read_id(path: Result<Path<i64>, PathRejection>, kind: &str) -> Result<i64, RecordFailure> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!("Rejected {} id: {}", kind, rejection);
        bad_request(&format!("invalid {} ID", kind))
    })
}

//=========================================================================================
// Note Handlers
//=========================================================================================

/// List all notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All stored notes", body = Vec<RecordDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_notes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecordDto>>, RecordFailure> {
    let notes = app_state.notes.list().await.map_err(record_failure)?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

/// Create a note.
#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Note created", body = RecordDto),
        (status = 400, description = "Invalid content", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RecordFailure> {
    let body = read_body(payload)?;
    let note = app_state
        .notes
        .create(&body.content)
        .await
        .map_err(record_failure)?;
    Ok((StatusCode::CREATED, Json(RecordDto::from(note))))
}

/// Fetch one note.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(("id" = i64, Path, description = "The note ID.")),
    responses(
        (status = 200, description = "The note", body = RecordDto),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn get_note_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<RecordDto>, RecordFailure> {
    let id = read_id(path, "note")?;
    let note = app_state.notes.get(id).await.map_err(record_failure)?;
    Ok(Json(note.into()))
}

/// Replace a note's content.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(("id" = i64, Path, description = "The note ID.")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "The updated note", body = RecordDto),
        (status = 400, description = "Invalid ID or content", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn update_note_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<Json<RecordDto>, RecordFailure> {
    let id = read_id(path, "note")?;
    let body = read_body(payload)?;
    let note = app_state
        .notes
        .update(id, body.content.as_deref())
        .await
        .map_err(record_failure)?;
    Ok(Json(note.into()))
}

/// Delete a note.
#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(("id" = i64, Path, description = "The note ID.")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    )
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, RecordFailure> {
    let id = read_id(path, "note")?;
    app_state.notes.delete(id).await.map_err(record_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Flashcard Handlers
//=========================================================================================

/// List all flashcards, newest first.
#[utoipa::path(
    get,
    path = "/flashcards",
    responses(
        (status = 200, description = "All stored flashcards", body = Vec<RecordDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_flashcards_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecordDto>>, RecordFailure> {
    let cards = app_state.flashcards.list().await.map_err(record_failure)?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

/// Create a flashcard.
#[utoipa::path(
    post,
    path = "/flashcards",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Flashcard created", body = RecordDto),
        (status = 400, description = "Invalid content", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_flashcard_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RecordFailure> {
    let body = read_body(payload)?;
    let card = app_state
        .flashcards
        .create(&body.content)
        .await
        .map_err(record_failure)?;
    Ok((StatusCode::CREATED, Json(RecordDto::from(card))))
}

#[utoipa::path(
    get,
    path = "/flashcards/{id}",
    params(("id" = i64, Path, description = "The flashcard ID.")),
    responses(
        (status = 200, description = "The flashcard", body = RecordDto),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "No such flashcard", body = ErrorResponse)
    )
)]
pub async fn get_flashcard_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<RecordDto>, RecordFailure> {
    let id = read_id(path, "flashcard")?;
    let card = app_state.flashcards.get(id).await.map_err(record_failure)?;
    Ok(Json(card.into()))
}

#[utoipa::path(
    put,
    path = "/flashcards/{id}",
    params(("id" = i64, Path, description = "The flashcard ID.")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "The updated flashcard", body = RecordDto),
        (status = 400, description = "Invalid ID or content", body = ErrorResponse),
        (status = 404, description = "No such flashcard", body = ErrorResponse)
    )
)]
pub async fn update_flashcard_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<Json<RecordDto>, RecordFailure> {
    let id = read_id(path, "flashcard")?;
    let body = read_body(payload)?;
    let card = app_state
        .flashcards
        .update(id, body.content.as_deref())
        .await
        .map_err(record_failure)?;
    Ok(Json(card.into()))
}

#[utoipa::path(
    delete,
    path = "/flashcards/{id}",
    params(("id" = i64, Path, description = "The flashcard ID.")),
    responses(
        (status = 204, description = "Flashcard deleted"),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "No such flashcard", body = ErrorResponse)
    )
)]
pub async fn delete_flashcard_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, RecordFailure> {
    let id = read_id(path, "flashcard")?;
    app_state
        .flashcards
        .delete(id)
        .await
        .map_err(record_failure)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_route() {
        let doc = openapi_document();
        assert_eq!(doc.info.title, "Notes Quiz API");
        assert_eq!(doc.info.version, env!("CARGO_PKG_VERSION"));

        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/notes/generate-quiz",
            "/notes",
            "/notes/{id}",
            "/flashcards",
            "/flashcards/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}
