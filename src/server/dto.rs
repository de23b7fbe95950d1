use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDraftRequest {
    pub name: String,
    pub text: String,
}

/// Body of `POST /api/drafts/{id}/comments`. The path names the draft; `id`
/// may repeat it but must agree.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDraftCommentRequest {
    #[serde(default)]
    pub id: Option<i64>,
    pub text: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchDraftsParams {
    pub text: String,
}

impl SearchDraftsParams {
    /// Takes the first `text` pair; repeats are ignored and a missing key
    /// means the empty substring.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let text = pairs
            .into_iter()
            .find(|(key, _)| key == "text")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Self { text }
    }
}
