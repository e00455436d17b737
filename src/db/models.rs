use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored news item. `url` is unique across the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Article {
    pub id: i64,
    pub source_id: Option<String>,
    pub source_name: String,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Article fields as written by an upsert; ids and bookkeeping timestamps are
/// assigned by the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub source_id: Option<String>,
    pub source_name: String,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}

/// An article joined with the time the user favorited or read it.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct MarkedArticle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub article: Article,
    pub marked_at: DateTime<Utc>,
}

/// Filters for the admin article listing. Every field is optional; `q` is a
/// case-insensitive substring match over title, description and author.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub source: Option<String>,
    pub q: Option<String>,
    pub limit: Option<u32>,
}
