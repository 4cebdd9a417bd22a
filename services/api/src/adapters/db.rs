//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of the
//! `NoteRepository` and `FlashcardRepository` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_quiz_core::domain::{Flashcard, Note};
use notes_quiz_core::ports::{FlashcardRepository, NoteRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the record repository ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

/// Row shape shared by the `notes` and `flashcards` tables.
#[derive(FromRow)]
struct ContentRecord {
    id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl ContentRecord {
    fn to_note(self) -> Note {
        Note {
            id: self.id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn to_flashcard(self) -> Flashcard {
        Flashcard {
            id: self.id,
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// Table-generic queries
//=========================================================================================

/// The two tables with the `ContentRecord` shape. Table names never come from input.
#[derive(Clone, Copy)]
enum Table {
    Notes,
    Flashcards,
}

impl Table {
    fn name(self) -> &'static str {
        match self {
            Table::Notes => "notes",
            Table::Flashcards => "flashcards",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Table::Notes => "note",
            Table::Flashcards => "flashcard",
        }
    }

    fn not_found(self, id: i64) -> PortError {
        PortError::NotFound(format!("{} with id {} not found", self.label(), id))
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

impl DbAdapter {
    async fn insert(&self, table: Table, content: &str) -> PortResult<ContentRecord> {
        let query = format!(
            "INSERT INTO {} (content) VALUES ($1) RETURNING id, content, created_at, updated_at",
            table.name()
        );
        sqlx::query_as::<_, ContentRecord>(&query)
            .bind(content)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn fetch_one(&self, table: Table, id: i64) -> PortResult<ContentRecord> {
        let query = format!(
            "SELECT id, content, created_at, updated_at FROM {} WHERE id = $1",
            table.name()
        );
        sqlx::query_as::<_, ContentRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| table.not_found(id))
    }

    async fn fetch_all(&self, table: Table) -> PortResult<Vec<ContentRecord>> {
        let query = format!(
            "SELECT id, content, created_at, updated_at FROM {} ORDER BY created_at DESC, id DESC",
            table.name()
        );
        sqlx::query_as::<_, ContentRecord>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)
    }

    async fn update(&self, table: Table, id: i64, content: &str) -> PortResult<ContentRecord> {
        let query = format!(
            "UPDATE {} SET content = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING id, content, created_at, updated_at",
            table.name()
        );
        sqlx::query_as::<_, ContentRecord>(&query)
            .bind(content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or_else(|| table.not_found(id))
    }

    async fn delete(&self, table: Table, id: i64) -> PortResult<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", table.name());
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(table.not_found(id));
        }
        Ok(())
    }
}

//=========================================================================================
// Port Trait Implementations
//=========================================================================================

#[async_trait]
impl NoteRepository for DbAdapter {
    async fn create_note(&self, content: &str) -> PortResult<Note> {
        Ok(self.insert(Table::Notes, content).await?.to_note())
    }

    async fn get_note_by_id(&self, id: i64) -> PortResult<Note> {
        Ok(self.fetch_one(Table::Notes, id).await?.to_note())
    }

    async fn get_all_notes(&self) -> PortResult<Vec<Note>> {
        let records = self.fetch_all(Table::Notes).await?;
        Ok(records.into_iter().map(|r| r.to_note()).collect())
    }

    async fn update_note(&self, id: i64, content: &str) -> PortResult<Note> {
        Ok(self.update(Table::Notes, id, content).await?.to_note())
    }

    async fn delete_note(&self, id: i64) -> PortResult<()> {
        self.delete(Table::Notes, id).await
    }
}

#[async_trait]
impl FlashcardRepository for DbAdapter {
    async fn create_flashcard(&self, content: &str) -> PortResult<Flashcard> {
        Ok(self.insert(Table::Flashcards, content).await?.to_flashcard())
    }

    async fn get_flashcard_by_id(&self, id: i64) -> PortResult<Flashcard> {
        Ok(self.fetch_one(Table::Flashcards, id).await?.to_flashcard())
    }

    async fn get_all_flashcards(&self) -> PortResult<Vec<Flashcard>> {
        let records = self.fetch_all(Table::Flashcards).await?;
        Ok(records.into_iter().map(|r| r.to_flashcard()).collect())
    }

    async fn update_flashcard(&self, id: i64, content: &str) -> PortResult<Flashcard> {
        Ok(self.update(Table::Flashcards, id, content).await?.to_flashcard())
    }

    async fn delete_flashcard(&self, id: i64) -> PortResult<()> {
        self.delete(Table::Flashcards, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_fixed() {
        assert_eq!(Table::Notes.name(), "notes");
        assert_eq!(Table::Flashcards.name(), "flashcards");
    }

    #[test]
    fn not_found_messages_name_the_record_kind() {
        let err = Table::Flashcards.not_found(9);
        assert_eq!(err.to_string(), "Item not found: flashcard with id 9 not found");
    }
}
