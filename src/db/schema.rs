//! SQL DDL for initializing the catalog storage (SQLite).

/// SQLite schema with:
/// - `users`: keyed by `username`; `secret` holds the encoded password hash
/// - `books`: `pk` INTEGER PRIMARY KEY AUTOINCREMENT, owned through `user`
/// - no uniqueness on (`user`, `id`); the same work may be shelved twice
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    secret BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    pk INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    classification TEXT NOT NULL DEFAULT '',
    id TEXT NOT NULL,
    user TEXT NOT NULL REFERENCES users(username)
);

CREATE INDEX IF NOT EXISTS idx_books_user ON books(user);
"#;
