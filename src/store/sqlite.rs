use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DOCUMENT_COLUMNS: &str = "id, name, createdat";
const DRAFT_COLUMNS: &str = "id, documentid, text, createdat";
const COMMENT_COLUMNS: &str = "id, userid, draftid, text, createdat";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Nothing survives the store.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn query_drafts(&self, sql: &str, substring: Option<&str>) -> Result<Vec<Draft>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;

        let rows = match substring {
            Some(s) => stmt.query_map(params![s], draft_from_row)?,
            None => stmt.query_map([], draft_from_row)?,
        };

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}

/// Reads a stored timestamp. A value that does not parse is a conversion
/// error for the whole row, never a substitute time.
fn get_datetime(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", raw, e);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
}

/// Fixed-width so that `ORDER BY createdat` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: get_datetime(row, 2)?,
    })
}

fn draft_from_row(row: &Row<'_>) -> rusqlite::Result<Draft> {
    Ok(Draft {
        id: row.get(0)?,
        document_id: row.get(1)?,
        text: row.get(2)?,
        created_at: get_datetime(row, 3)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        draft_id: row.get(2)?,
        text: row.get(3)?,
        created_at: get_datetime(row, 4)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Document operations

    fn insert_document(&self, name: &str, created_at: &DateTime<Utc>) -> Result<i64> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO documents (name, createdat) VALUES (?1, ?2)",
            params![name, format_datetime(created_at)],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_document(&self, id: i64) -> Result<Option<Document>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id],
            document_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_document_by_name(&self, name: &str) -> Result<Option<Document>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE name = ?1"),
            params![name],
            document_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id"
        ))?;

        let rows = stmt.query_map([], document_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Draft operations

    fn insert_draft(
        &self,
        document_id: i64,
        text: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO drafts (documentid, text, createdat) VALUES (?1, ?2, ?3)",
            params![document_id, text, format_datetime(created_at)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_draft(&self, id: i64) -> Result<Option<Draft>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {DRAFT_COLUMNS} FROM drafts WHERE id = ?1"),
            params![id],
            draft_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.query_drafts(
            &format!("SELECT {DRAFT_COLUMNS} FROM drafts ORDER BY id"),
            None,
        )
    }

    fn search_drafts(&self, substring: &str) -> Result<Vec<Draft>> {
        self.query_drafts(
            &format!(
                "SELECT {DRAFT_COLUMNS} FROM drafts
                 WHERE text LIKE '%' || ?1 || '%' ORDER BY id"
            ),
            Some(substring),
        )
    }

    fn latest_draft_for_document(&self, document_id: i64) -> Result<Option<Draft>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {DRAFT_COLUMNS} FROM drafts WHERE documentid = ?1
                 ORDER BY createdat DESC, id DESC LIMIT 1"
            ),
            params![document_id],
            draft_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Comment operations

    fn insert_comment(
        &self,
        user_id: i64,
        draft_id: i64,
        text: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO comments (userid, draftid, text, createdat) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, draft_id, text, format_datetime(created_at)],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
            params![id],
            comment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_draft_comments(&self, draft_id: i64) -> Result<Vec<Comment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE draftid = ?1 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![draft_id], comment_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        self.conn()
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}
