pub const SCHEMA: &str = r#"
-- Documents are identified by name; drafts attach to them
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER NOT NULL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    createdat TEXT NOT NULL
);

-- Drafts hold the versioned text of a document
CREATE TABLE IF NOT EXISTS drafts (
    id INTEGER NOT NULL PRIMARY KEY,
    documentid INTEGER NOT NULL REFERENCES documents(id),
    text TEXT NOT NULL,
    createdat TEXT NOT NULL
);

-- Comments are left on a single draft by a user
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER NOT NULL PRIMARY KEY,
    userid INTEGER NOT NULL,
    draftid INTEGER NOT NULL REFERENCES drafts(id),
    text TEXT NOT NULL,
    createdat TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_drafts_document ON drafts(documentid, createdat);
CREATE INDEX IF NOT EXISTS idx_comments_draft ON comments(draftid);
"#;
