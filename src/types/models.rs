use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    #[serde(rename = "createdat")]
    pub created_at: DateTime<Utc>,
}

/// A versioned body of text belonging to a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub id: i64,
    #[serde(rename = "documentid")]
    pub document_id: i64,
    pub text: String,
    #[serde(rename = "createdat")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "userid")]
    pub user_id: i64,
    #[serde(rename = "draftid")]
    pub draft_id: i64,
    pub text: String,
    #[serde(rename = "createdat")]
    pub created_at: DateTime<Utc>,
}

/// A document name paired with the text of its most recent draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub text: String,
}
