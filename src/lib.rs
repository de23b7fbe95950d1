//! # Draftdesk
//!
//! An HTTP service for documents, their drafts, and comments on drafts,
//! usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use draftdesk::server::{AppState, create_router};
//! use draftdesk::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/documents.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), 1));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `draftdesk` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod store;
pub mod types;
