mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Inserts return the id the database assigned to the new row. Lookups return
/// `Ok(None)` when no row matches so callers can tell an absent row apart
/// from a failing query.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Document operations
    fn insert_document(&self, name: &str, created_at: &DateTime<Utc>) -> Result<i64>;
    fn get_document(&self, id: i64) -> Result<Option<Document>>;
    fn get_document_by_name(&self, name: &str) -> Result<Option<Document>>;
    fn list_documents(&self) -> Result<Vec<Document>>;

    // Draft operations
    fn insert_draft(
        &self,
        document_id: i64,
        text: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<i64>;
    fn get_draft(&self, id: i64) -> Result<Option<Draft>>;
    fn list_drafts(&self) -> Result<Vec<Draft>>;
    fn search_drafts(&self, substring: &str) -> Result<Vec<Draft>>;
    fn latest_draft_for_document(&self, document_id: i64) -> Result<Option<Draft>>;

    // Comment operations
    fn insert_comment(
        &self,
        user_id: i64,
        draft_id: i64,
        text: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<i64>;
    fn get_comment(&self, id: i64) -> Result<Option<Comment>>;
    fn list_draft_comments(&self, draft_id: i64) -> Result<Vec<Comment>>;

    fn close(&self) -> Result<()>;
}
