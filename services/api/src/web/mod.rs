pub mod protocol;
pub mod quiz;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use quiz::generate_quiz_handler;
pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the full HTTP router over the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(rest::health_handler))
        .route("/api-docs/openapi.json", get(rest::openapi_handler))
        .route("/notes/generate-quiz", post(generate_quiz_handler))
        .route(
            "/notes",
            get(rest::list_notes_handler).post(rest::create_note_handler),
        )
        .route(
            "/notes/{id}",
            get(rest::get_note_handler)
                .put(rest::update_note_handler)
                .delete(rest::delete_note_handler),
        )
        .route(
            "/flashcards",
            get(rest::list_flashcards_handler).post(rest::create_flashcard_handler),
        )
        .route(
            "/flashcards/{id}",
            get(rest::get_flashcard_handler)
                .put(rest::update_flashcard_handler)
                .delete(rest::delete_flashcard_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
