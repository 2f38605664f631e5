//! Local progress store.
//!
//! Handles SQLite initialization, vocabulary item CRUD (soft delete only),
//! SM-2 learning progress persistence, and the simulated current date.

use crate::error::{EngineError, Result};
use crate::models::{ImportCandidate, LearningProgress, Placement, Scope, VocabularyItem};
use chrono::{Days, Local, NaiveDate, Utc};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::path::Path;

const ITEM_COLUMNS: &str = "v.id, v.book_id, v.chapter_id, v.section_id, v.source_text, \
     v.target_text, v.notes, v.created_at, v.updated_at, v.deleted_at";

const PROGRESS_COLUMNS: &str = "p.item_id, p.ease_factor, p.interval_days, p.repetitions, \
     p.total_reviews, p.correct_reviews, p.next_review_date, p.last_review_date";

/// Opens (or creates) the database file and its tables.
///
/// Sets the current date to today if not already initialized.
pub fn init_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();
    debug!("Opening database at {}", path.display());
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Same schema in memory; used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vocabulary_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            book_id INTEGER,
            chapter_id INTEGER,
            section_id INTEGER,
            source_text TEXT NOT NULL,
            target_text TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )",
        (),
    )?;

    // One row per item, created on first grading
    conn.execute(
        "CREATE TABLE IF NOT EXISTS learning_progress (
            item_id INTEGER PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            total_reviews INTEGER NOT NULL DEFAULT 0,
            correct_reviews INTEGER NOT NULL DEFAULT 0,
            next_review_date TEXT NOT NULL,
            last_review_date TEXT,
            FOREIGN KEY (item_id) REFERENCES vocabulary_items(id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    let today = Local::now().date_naive();
    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![today],
    )?;

    Ok(())
}

/// Retrieves the simulated current date.
pub fn get_current_date(conn: &Connection) -> Result<NaiveDate> {
    let date = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;
    Ok(date)
}

pub fn set_current_date(date: NaiveDate, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![date],
    )?;
    Ok(())
}

/// Moves the simulated date one day forward (for trying out schedules).
pub fn advance_day(conn: &Connection) -> Result<NaiveDate> {
    let next_day = get_current_date(conn)? + Days::new(1);
    set_current_date(next_day, conn)?;
    info!("Current date advanced to {}", next_day);
    Ok(next_day)
}

/// Inserts a vocabulary item and returns its id. No progress row is
/// created until the item is first graded.
pub fn add_vocabulary_item(
    candidate: &ImportCandidate,
    placement: &Placement,
    conn: &Connection,
) -> Result<i64> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO vocabulary_items
            (book_id, chapter_id, section_id, source_text, target_text, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            placement.book_id,
            placement.chapter_id,
            placement.section_id,
            candidate.source_text,
            candidate.target_text,
            candidate.notes,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        "Added vocabulary item {} ('{}' / '{}')",
        id, candidate.source_text, candidate.target_text
    );
    Ok(id)
}

pub fn get_vocabulary_item(id: i64, conn: &Connection) -> Result<VocabularyItem> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM vocabulary_items v WHERE v.id = ?1"),
        params![id],
        row_to_item,
    )
    .optional()?
    .ok_or(EngineError::ItemNotFound(id))
}

/// Marks an item deleted. It stays in the table but drops out of every
/// scope and due query.
pub fn soft_delete_item(id: i64, conn: &Connection) -> Result<()> {
    let now = Utc::now();
    let changed = conn.execute(
        "UPDATE vocabulary_items SET deleted_at = ?1, updated_at = ?1
         WHERE id = ?2 AND deleted_at IS NULL",
        params![now, id],
    )?;

    if changed == 0 {
        get_vocabulary_item(id, conn)?;
        debug!("Item {} was already deleted", id);
    } else {
        info!("Soft-deleted vocabulary item {}", id);
    }
    Ok(())
}

fn scope_filter(scope: Scope) -> (&'static str, Option<i64>) {
    match scope {
        Scope::Book(id) => ("v.book_id = ?1", Some(id)),
        Scope::Chapter(id) => ("v.chapter_id = ?1", Some(id)),
        Scope::Section(id) => ("v.section_id = ?1", Some(id)),
        Scope::Unsorted => (
            "v.book_id IS NULL AND v.chapter_id IS NULL AND v.section_id IS NULL",
            None,
        ),
        Scope::All => ("1 = 1", None),
    }
}

/// Loads every live item in a scope, oldest first.
pub fn load_scope(scope: Scope, conn: &Connection) -> Result<Vec<VocabularyItem>> {
    let (filter, id) = scope_filter(scope);
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM vocabulary_items v
         WHERE v.deleted_at IS NULL AND {filter}
         ORDER BY v.id ASC"
    ))?;

    let items = stmt
        .query_map(params_from_iter(id), row_to_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!("Loaded {} items for {:?}", items.len(), scope);
    Ok(items)
}

pub fn get_progress(item_id: i64, conn: &Connection) -> Result<Option<LearningProgress>> {
    let progress = conn
        .query_row(
            &format!("SELECT {PROGRESS_COLUMNS} FROM learning_progress p WHERE p.item_id = ?1"),
            params![item_id],
            row_to_progress,
        )
        .optional()?;
    Ok(progress)
}

/// Stores the scheduler's output, replacing any earlier record.
pub fn save_progress(progress: &LearningProgress, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO learning_progress
            (item_id, ease_factor, interval_days, repetitions, total_reviews,
             correct_reviews, next_review_date, last_review_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(item_id) DO UPDATE SET
            ease_factor = excluded.ease_factor,
            interval_days = excluded.interval_days,
            repetitions = excluded.repetitions,
            total_reviews = excluded.total_reviews,
            correct_reviews = excluded.correct_reviews,
            next_review_date = excluded.next_review_date,
            last_review_date = excluded.last_review_date",
        params![
            progress.item_id,
            progress.ease_factor,
            progress.interval,
            progress.repetitions,
            progress.total_reviews,
            progress.correct_reviews,
            progress.next_review_date,
            progress.last_review_date
        ],
    )?;
    Ok(())
}

/// Items in a scope that are due on the current date. Never-reviewed items
/// come first, then by next review date (oldest first).
pub fn get_items_due_for_review(
    scope: Scope,
    conn: &Connection,
) -> Result<Vec<(VocabularyItem, Option<LearningProgress>)>> {
    let current_date = get_current_date(conn)?;
    let (filter, id) = scope_filter(scope);

    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS}, {PROGRESS_COLUMNS}
         FROM vocabulary_items v
         LEFT JOIN learning_progress p ON p.item_id = v.id
         WHERE v.deleted_at IS NULL AND {filter}
           AND (p.item_id IS NULL OR p.next_review_date <= ?{date_param})
         ORDER BY p.next_review_date IS NOT NULL, p.next_review_date ASC, v.id ASC",
        date_param = if id.is_some() { 2 } else { 1 }
    ))?;

    let mut values: Vec<rusqlite::types::Value> = Vec::new();
    if let Some(id) = id {
        values.push(id.into());
    }
    values.push(current_date.format("%F").to_string().into());

    let due = stmt
        .query_map(params_from_iter(values), |row| {
            let item = row_to_item(row)?;
            let has_progress: Option<i64> = row.get(10)?;
            let progress = match has_progress {
                Some(_) => Some(progress_from(row, 10)?),
                None => None,
            };
            Ok((item, progress))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(due)
}

fn row_to_item(row: &Row) -> rusqlite::Result<VocabularyItem> {
    Ok(VocabularyItem {
        id: row.get(0)?,
        book_id: row.get(1)?,
        chapter_id: row.get(2)?,
        section_id: row.get(3)?,
        source_text: row.get(4)?,
        target_text: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        deleted_at: row.get(9)?,
    })
}

fn row_to_progress(row: &Row) -> rusqlite::Result<LearningProgress> {
    progress_from(row, 0)
}

fn progress_from(row: &Row, offset: usize) -> rusqlite::Result<LearningProgress> {
    Ok(LearningProgress {
        item_id: row.get(offset)?,
        ease_factor: row.get(offset + 1)?,
        interval: row.get(offset + 2)?,
        repetitions: row.get(offset + 3)?,
        total_reviews: row.get(offset + 4)?,
        correct_reviews: row.get(offset + 5)?,
        next_review_date: row.get(offset + 6)?,
        last_review_date: row.get(offset + 7)?,
    })
}
