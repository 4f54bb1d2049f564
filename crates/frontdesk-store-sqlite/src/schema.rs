//! SQL schema for the frontdesk SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Documents are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS documents (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id  TEXT NOT NULL UNIQUE,
    collection   TEXT NOT NULL,   -- 'mensajes' | 'reservas'
    stored_at    TEXT NOT NULL,   -- ISO 8601 UTC; store-assigned
    body_json    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents(collection, seq);

PRAGMA user_version = 1;
";
