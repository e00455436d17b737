//! SQL DDL for initializing the news storage.

/// SQLite schema with:
/// - `users`: stand-in for an account table; authenticated by `api_token`
/// - `articles`: `url` UNIQUE, the upsert key for fetched news
/// - `read_history` / `favorites`: one row per (user, article) pair,
///   cascading on delete of either side
///
/// Timestamps are RFC3339 TEXT so lexical order matches time order.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    api_token TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_id TEXT NULL,
    source_name TEXT NOT NULL,
    author TEXT NULL,
    title TEXT NOT NULL,
    description TEXT NULL,
    url TEXT NOT NULL UNIQUE,
    url_to_image TEXT NULL,
    published_at TEXT NOT NULL,
    content TEXT NULL,
    category TEXT NOT NULL DEFAULT 'culture',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles(published_at DESC);
CREATE INDEX IF NOT EXISTS idx_articles_category ON articles(category, published_at DESC);

CREATE TABLE IF NOT EXISTS read_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    read_at TEXT NOT NULL,
    UNIQUE(user_id, article_id)
);

CREATE TABLE IF NOT EXISTS favorites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    article_id INTEGER NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
    favorited_at TEXT NOT NULL,
    UNIQUE(user_id, article_id)
);
"#;
