//! In-memory fakes of the core ports, for tests in this crate and its dependents.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Flashcard, Note};
use crate::ports::{FlashcardRepository, GenerativeModel, NoteRepository, PortError, PortResult};

#[derive(Default)]
struct Records {
    next_id: i64,
    rows: BTreeMap<i64, (String, chrono::DateTime<Utc>, chrono::DateTime<Utc>)>,
    listing_failure: Option<String>,
}

impl Records {
    fn insert(&mut self, content: &str) -> i64 {
        self.next_id += 1;
        let now = Utc::now();
        self.rows
            .insert(self.next_id, (content.to_string(), now, now));
        self.next_id
    }

    /// Ids newest first.
    fn ids_newest_first(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.rows.keys().copied().collect();
        ids.sort_by(|a, b| {
            let (_, created_a, _) = &self.rows[a];
            let (_, created_b, _) = &self.rows[b];
            created_b.cmp(created_a).then(b.cmp(a))
        });
        ids
    }
}

/// A note repository backed by a map. Ids start at 1.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    records: Mutex<Records>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `get_all_notes` fail with `PortError::Unexpected(message)`.
    pub fn fail_listing(&self, message: &str) {
        self.lock().listing_failure = Some(message.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn note(records: &Records, id: i64) -> PortResult<Note> {
        records
            .rows
            .get(&id)
            .map(|(content, created_at, updated_at)| Note {
                id,
                content: content.clone(),
                created_at: *created_at,
                updated_at: *updated_at,
            })
            .ok_or_else(|| PortError::NotFound(format!("note with id {} not found", id)))
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn create_note(&self, content: &str) -> PortResult<Note> {
        let mut records = self.lock();
        let id = records.insert(content);
        Self::note(&records, id)
    }

    async fn get_note_by_id(&self, id: i64) -> PortResult<Note> {
        Self::note(&self.lock(), id)
    }

    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let records = self.lock();
        if let Some(message) = &records.listing_failure {
            return Err(PortError::Unexpected(message.clone()));
        }
        records
            .ids_newest_first()
            .into_iter()
            .map(|id| Self::note(&records, id))
            .collect()
    }

    async fn update_note(&self, id: i64, content: &str) -> PortResult<Note> {
        let mut records = self.lock();
        let row = records
            .rows
            .get_mut(&id)
            .ok_or_else(|| PortError::NotFound(format!("note with id {} not found", id)))?;
        row.0 = content.to_string();
        row.2 = Utc::now();
        Self::note(&records, id)
    }

    async fn delete_note(&self, id: i64) -> PortResult<()> {
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("note with id {} not found", id)))
    }
}

/// A flashcard repository backed by a map. Ids start at 1.
#[derive(Default)]
pub struct InMemoryFlashcardRepository {
    records: Mutex<Records>,
}

impl InMemoryFlashcardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn flashcard(records: &Records, id: i64) -> PortResult<Flashcard> {
        records
            .rows
            .get(&id)
            .map(|(content, created_at, updated_at)| Flashcard {
                id,
                content: content.clone(),
                created_at: *created_at,
                updated_at: *updated_at,
            })
            .ok_or_else(|| PortError::NotFound(format!("flashcard with id {} not found", id)))
    }
}

#[async_trait]
impl FlashcardRepository for InMemoryFlashcardRepository {
    async fn create_flashcard(&self, content: &str) -> PortResult<Flashcard> {
        let mut records = self.lock();
        let id = records.insert(content);
        Self::flashcard(&records, id)
    }

    async fn get_flashcard_by_id(&self, id: i64) -> PortResult<Flashcard> {
        Self::flashcard(&self.lock(), id)
    }

    async fn get_all_flashcards(&self) -> PortResult<Vec<Flashcard>> {
        let records = self.lock();
        records
            .ids_newest_first()
            .into_iter()
            .map(|id| Self::flashcard(&records, id))
            .collect()
    }

    async fn update_flashcard(&self, id: i64, content: &str) -> PortResult<Flashcard> {
        let mut records = self.lock();
        let row = records
            .rows
            .get_mut(&id)
            .ok_or_else(|| PortError::NotFound(format!("flashcard with id {} not found", id)))?;
        row.0 = content.to_string();
        row.2 = Utc::now();
        Self::flashcard(&records, id)
    }

    async fn delete_flashcard(&self, id: i64) -> PortResult<()> {
        self.lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("flashcard with id {} not found", id)))
    }
}

/// A model that replays queued replies and records every call it receives.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<PortResult<String>>>,
    calls: Mutex<Vec<(String, f32)>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(reply: impl Into<String>) -> Self {
        let model = Self::new();
        model.push_reply(Ok(reply.into()));
        model
    }

    pub fn failing(message: impl Into<String>) -> Self {
        let model = Self::new();
        model.push_reply(Err(PortError::Unexpected(message.into())));
        model
    }

    pub fn push_reply(&self, reply: PortResult<String>) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }

    /// Prompts and temperatures received so far.
    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn complete(&self, prompt: &str, temperature: f32) -> PortResult<String> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((prompt.to_string(), temperature));
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unexpected("no scripted reply left".to_string())))
    }
}
