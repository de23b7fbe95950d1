mod models;

pub use models::{Comment, Document, DocumentSummary, Draft};
