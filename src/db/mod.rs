//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: pool setup and article queries
//! - `activity.rs`: users, favorites and read history

pub mod activity;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use activity::FavoriteToggle;
pub use models::{Article, ArticleQuery, MarkedArticle, NewArticle, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{NewsStorage, SqlitePool};
