//! Data-access operations shared by every request handler.
//!
//! The service owns no state besides the injected store handle. None of the
//! multi-step operations run inside a transaction.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Comment, Document, DocumentSummary, Draft};

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn Store>,
}

impl DocumentService {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Returns the document called `name`, creating it first if needed.
    ///
    /// Names are unique in the store. When a concurrent caller inserts the
    /// same name between our lookup and our insert, the winner's row is
    /// returned instead of an error.
    pub fn create_document(&self, name: &str) -> Result<Document> {
        if let Some(existing) = self.store.get_document_by_name(name)? {
            return Ok(existing);
        }

        match self.store.insert_document(name, &Utc::now()) {
            Ok(id) => {
                info!(id, document = name, "created document");
                self.get_document_by_id(id)
            }
            Err(Error::AlreadyExists) => {
                debug!(document = name, "document created concurrently, re-reading");
                self.get_document_by_name(name)
            }
            Err(e) => Err(e),
        }
    }

    pub fn get_document_by_name(&self, name: &str) -> Result<Document> {
        self.store
            .get_document_by_name(name)?
            .ok_or(Error::NotFound)
    }

    pub fn get_document_by_id(&self, id: i64) -> Result<Document> {
        self.store.get_document(id)?.ok_or(Error::NotFound)
    }

    pub fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.store.list_drafts()
    }

    /// Pairs every document with the text of its newest draft.
    ///
    /// Documents that have no draft yet are left out of the listing.
    pub fn list_documents_with_latest_draft(&self) -> Result<Vec<DocumentSummary>> {
        let documents = self.store.list_documents()?;
        let mut summaries = Vec::with_capacity(documents.len());

        for document in documents {
            match self.store.latest_draft_for_document(document.id)? {
                Some(draft) => summaries.push(DocumentSummary {
                    name: document.name,
                    text: draft.text,
                }),
                None => debug!(id = document.id, "skipping document without drafts"),
            }
        }

        Ok(summaries)
    }

    pub fn create_draft(&self, name: &str, text: &str) -> Result<Draft> {
        let document = self.create_document(name)?;
        let id = self.store.insert_draft(document.id, text, &Utc::now())?;
        info!(id, document_id = document.id, "created draft");
        self.get_draft_by_id(id)
    }

    pub fn get_draft_by_id(&self, id: i64) -> Result<Draft> {
        self.store.get_draft(id)?.ok_or(Error::NotFound)
    }

    /// Leaves a comment from `user_id` on an existing draft.
    pub fn create_draft_comment(&self, user_id: i64, draft_id: i64, text: &str) -> Result<Comment> {
        let draft = self.get_draft_by_id(draft_id)?;
        let id = self
            .store
            .insert_comment(user_id, draft.id, text, &Utc::now())?;
        info!(id, draft_id = draft.id, user_id, "created comment");
        self.get_draft_comment_by_id(id)
    }

    pub fn get_draft_comment_by_id(&self, id: i64) -> Result<Comment> {
        self.store.get_comment(id)?.ok_or(Error::NotFound)
    }

    pub fn list_draft_comments(&self, draft_id: i64) -> Result<Vec<Comment>> {
        let draft = self.get_draft_by_id(draft_id)?;
        self.store.list_draft_comments(draft.id)
    }

    /// Drafts whose text contains `substring`, using the store's `LIKE`
    /// matching. An empty substring matches every draft.
    pub fn search_drafts(&self, substring: &str) -> Result<Vec<Draft>> {
        self.store.search_drafts(substring)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::{DateTime, Duration};

    use super::*;
    use crate::store::SqliteStore;

    fn service() -> DocumentService {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        DocumentService::new(Arc::new(store))
    }

    #[test]
    fn test_create_document_is_get_or_create() {
        let service = service();

        let first = service.create_document("notes").unwrap();
        let second = service.create_document("notes").unwrap();

        assert_eq!(first, second);
        assert_eq!(service.store().list_documents().unwrap().len(), 1);
    }

    #[test]
    fn test_document_lookups() {
        let service = service();
        let doc = service.create_document("notes").unwrap();

        assert_eq!(service.get_document_by_id(doc.id).unwrap().name, "notes");
        assert_eq!(service.get_document_by_name("notes").unwrap().id, doc.id);
        assert!(matches!(
            service.get_document_by_id(doc.id + 1),
            Err(Error::NotFound)
        ));
        assert!(matches!(
            service.get_document_by_name("other"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_list_drafts_empty() {
        assert!(service().list_drafts().unwrap().is_empty());
    }

    #[test]
    fn test_drafts_share_document_by_name() {
        let service = service();

        let a = service.create_draft("doc1", "hello").unwrap();
        let b = service.create_draft("doc1", "world").unwrap();
        let c = service.create_draft("doc2", "other").unwrap();

        assert_eq!(a.document_id, b.document_id);
        assert_ne!(a.document_id, c.document_id);
        assert_eq!(a.text, "hello");
        assert_eq!(service.list_drafts().unwrap().len(), 3);
        assert_eq!(service.store().list_documents().unwrap().len(), 2);
    }

    #[test]
    fn test_create_draft_comment() {
        let service = service();
        let draft = service.create_draft("doc", "body").unwrap();

        let comment = service.create_draft_comment(3, draft.id, "looks good").unwrap();
        assert_eq!(comment.text, "looks good");
        assert_eq!(comment.user_id, 3);
        assert_eq!(comment.draft_id, draft.id);

        let fetched = service.get_draft_comment_by_id(comment.id).unwrap();
        assert_eq!(fetched, comment);
        assert_eq!(service.list_draft_comments(draft.id).unwrap(), vec![comment]);
    }

    #[test]
    fn test_comment_on_missing_draft() {
        let service = service();

        let result = service.create_draft_comment(1, 99, "nobody home");
        assert!(matches!(result, Err(Error::NotFound)));
        assert!(matches!(service.list_draft_comments(99), Err(Error::NotFound)));
    }

    #[test]
    fn test_search_drafts() {
        let service = service();
        service.create_draft("doc", "test draft text").unwrap();
        service.create_draft("doc", "unrelated").unwrap();

        let hits = service.search_drafts("draft").unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|d| d.text.contains("draft")));
        assert!(service.search_drafts("nothing like it").unwrap().is_empty());
        assert_eq!(service.search_drafts("").unwrap().len(), 2);
    }

    #[test]
    fn test_latest_draft_listing_skips_empty_documents() {
        let service = service();
        let now = Utc::now();

        let doc1 = service.create_document("Test document 1").unwrap();
        let doc2 = service.create_document("Test document 2").unwrap();
        service.create_document("No drafts").unwrap();

        let store = service.store();
        store
            .insert_draft(doc1.id, "Doc1 draft1", &(now - Duration::seconds(10)))
            .unwrap();
        store.insert_draft(doc1.id, "Doc1 draft2", &now).unwrap();
        store.insert_draft(doc2.id, "Doc2 draft2", &now).unwrap();
        store
            .insert_draft(doc2.id, "Doc2 draft1", &(now - Duration::seconds(10)))
            .unwrap();

        let summaries = service.list_documents_with_latest_draft().unwrap();
        assert_eq!(
            summaries,
            vec![
                DocumentSummary {
                    name: "Test document 1".to_string(),
                    text: "Doc1 draft2".to_string(),
                },
                DocumentSummary {
                    name: "Test document 2".to_string(),
                    text: "Doc2 draft2".to_string(),
                },
            ]
        );
    }

    /// Inserts the requested name from "another writer" right before the
    /// first insert attempt, forcing the unique-name conflict path.
    struct RacingStore {
        inner: SqliteStore,
        raced: AtomicBool,
    }

    impl Store for RacingStore {
        fn initialize(&self) -> Result<()> {
            self.inner.initialize()
        }
        fn insert_document(&self, name: &str, created_at: &DateTime<Utc>) -> Result<i64> {
            if !self.raced.swap(true, Ordering::SeqCst) {
                self.inner.insert_document(name, created_at)?;
            }
            self.inner.insert_document(name, created_at)
        }
        fn get_document(&self, id: i64) -> Result<Option<Document>> {
            self.inner.get_document(id)
        }
        fn get_document_by_name(&self, name: &str) -> Result<Option<Document>> {
            self.inner.get_document_by_name(name)
        }
        fn list_documents(&self) -> Result<Vec<Document>> {
            self.inner.list_documents()
        }
        fn insert_draft(
            &self,
            document_id: i64,
            text: &str,
            created_at: &DateTime<Utc>,
        ) -> Result<i64> {
            self.inner.insert_draft(document_id, text, created_at)
        }
        fn get_draft(&self, id: i64) -> Result<Option<Draft>> {
            self.inner.get_draft(id)
        }
        fn list_drafts(&self) -> Result<Vec<Draft>> {
            self.inner.list_drafts()
        }
        fn search_drafts(&self, substring: &str) -> Result<Vec<Draft>> {
            self.inner.search_drafts(substring)
        }
        fn latest_draft_for_document(&self, document_id: i64) -> Result<Option<Draft>> {
            self.inner.latest_draft_for_document(document_id)
        }
        fn insert_comment(
            &self,
            user_id: i64,
            draft_id: i64,
            text: &str,
            created_at: &DateTime<Utc>,
        ) -> Result<i64> {
            self.inner.insert_comment(user_id, draft_id, text, created_at)
        }
        fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
            self.inner.get_comment(id)
        }
        fn list_draft_comments(&self, draft_id: i64) -> Result<Vec<Comment>> {
            self.inner.list_draft_comments(draft_id)
        }
        fn close(&self) -> Result<()> {
            self.inner.close()
        }
    }

    #[test]
    fn test_create_document_resolves_name_conflict() {
        let inner = SqliteStore::in_memory().unwrap();
        inner.initialize().unwrap();
        let service = DocumentService::new(Arc::new(RacingStore {
            inner,
            raced: AtomicBool::new(false),
        }));

        let doc = service.create_document("contested").unwrap();
        assert_eq!(doc.name, "contested");

        let draft = service.create_draft("contested", "text").unwrap();
        assert_eq!(draft.document_id, doc.id);
        assert_eq!(service.store().list_documents().unwrap().len(), 1);
    }
}
