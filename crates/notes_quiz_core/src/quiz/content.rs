//! Resolves note identifiers into the grounding text handed to the model.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::Note;
use crate::ports::{NoteRepository, PortError};
use crate::quiz::error::{QuizError, QuizResult};

const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// The outcome of resolving explicit ids: the notes found plus the ids that were skipped.
#[derive(Debug, Default)]
pub struct ResolvedNotes {
    pub notes: Vec<Note>,
    pub skipped: Vec<(i64, PortError)>,
}

impl ResolvedNotes {
    fn push(mut self, id: i64, fetched: Result<Note, PortError>) -> Self {
        match fetched {
            Ok(note) => self.notes.push(note),
            Err(e) => {
                warn!(note_id = id, "Skipping unresolvable note: {}", e);
                self.skipped.push((id, e));
            }
        }
        self
    }
}

#[derive(Clone)]
pub struct ContentAggregator {
    notes: Arc<dyn NoteRepository>,
}

impl ContentAggregator {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Builds the grounding text for `note_ids`, or for every note when the slice is empty.
    ///
    /// Individual lookups that fail are logged and skipped. Fails with
    /// `NoContentFound` only when nothing resolved.
    pub async fn resolve(&self, note_ids: &[i64]) -> QuizResult<String> {
        let notes = if note_ids.is_empty() {
            info!("No specific note ids provided, fetching all notes");
            self.notes
                .get_all_notes()
                .await
                .map_err(QuizError::NoteLookup)?
        } else {
            info!(count = note_ids.len(), "Fetching notes by id");
            let resolved = self.fetch_each(note_ids).await;
            if !resolved.skipped.is_empty() {
                warn!(
                    skipped = resolved.skipped.len(),
                    resolved = resolved.notes.len(),
                    "Some requested notes could not be resolved"
                );
            }
            resolved.notes
        };

        if notes.is_empty() {
            warn!("No notes found for quiz generation");
            return Err(QuizError::NoContentFound);
        }

        let content = render(&notes);
        info!(
            notes = notes.len(),
            chars = content.len(),
            "Combined notes into grounding text"
        );
        Ok(content)
    }

    /// Fetches ids one at a time, in order, folding failures into the skipped list.
    pub async fn fetch_each(&self, note_ids: &[i64]) -> ResolvedNotes {
        let mut resolved = ResolvedNotes::default();
        for &id in note_ids {
            let fetched = self.notes.get_note_by_id(id).await;
            resolved = resolved.push(id, fetched);
        }
        resolved
    }
}

fn render(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|note| format!("Note {}: {}", note.id, note.content))
        .collect::<Vec<_>>()
        .join(NOTE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryNoteRepository;

    async fn seeded() -> Arc<InMemoryNoteRepository> {
        let repo = Arc::new(InMemoryNoteRepository::new());
        repo.create_note("Ownership moves values").await.unwrap();
        repo.create_note("Borrows are references").await.unwrap();
        repo.create_note("Lifetimes bound borrows").await.unwrap();
        repo
    }

    #[tokio::test]
    async fn explicit_ids_follow_input_order() {
        let aggregator = ContentAggregator::new(seeded().await);
        let text = aggregator.resolve(&[3, 1]).await.unwrap();

        assert_eq!(
            text,
            "Note 3: Lifetimes bound borrows\n\n---\n\nNote 1: Ownership moves values"
        );
    }

    #[tokio::test]
    async fn empty_ids_use_every_note_newest_first() {
        let aggregator = ContentAggregator::new(seeded().await);
        let text = aggregator.resolve(&[]).await.unwrap();

        let ids: Vec<&str> = text
            .split(NOTE_SEPARATOR)
            .map(|entry| entry.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["Note 3", "Note 2", "Note 1"]);
    }

    #[tokio::test]
    async fn unresolvable_ids_are_skipped() {
        let aggregator = ContentAggregator::new(seeded().await);
        let resolved = aggregator.fetch_each(&[99, 2, -4]).await;

        assert_eq!(resolved.notes.len(), 1);
        assert_eq!(resolved.notes[0].id, 2);
        let skipped: Vec<i64> = resolved.skipped.iter().map(|(id, _)| *id).collect();
        assert_eq!(skipped, vec![99, -4]);

        let text = aggregator.resolve(&[99, 2]).await.unwrap();
        assert_eq!(text, "Note 2: Borrows are references");
    }

    #[tokio::test]
    async fn all_ids_unresolvable_is_no_content() {
        let aggregator = ContentAggregator::new(seeded().await);
        let err = aggregator.resolve(&[40, 41]).await.unwrap_err();
        assert!(matches!(err, QuizError::NoContentFound));
    }

    #[tokio::test]
    async fn empty_repository_is_no_content() {
        let aggregator = ContentAggregator::new(Arc::new(InMemoryNoteRepository::new()));
        let err = aggregator.resolve(&[]).await.unwrap_err();
        assert!(matches!(err, QuizError::NoContentFound));
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let repo = Arc::new(InMemoryNoteRepository::new());
        repo.fail_listing("connection reset");
        let aggregator = ContentAggregator::new(repo);

        let err = aggregator.resolve(&[]).await.unwrap_err();
        assert!(matches!(err, QuizError::NoteLookup(_)));
    }
}
