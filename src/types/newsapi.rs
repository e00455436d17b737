use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::NewArticle;
use crate::error::NewsError;

pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNTITLED: &str = "Untitled";

/// Response envelope shared by `/top-headlines` and `/everything`.
///
/// Success: `{"status":"ok","totalResults":N,"articles":[...]}`.
/// Failure: `{"status":"error","code":"apiKeyInvalid","message":"..."}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<ApiArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewsApiEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Turn an `error` envelope into `NewsError::NewsApi`.
    pub fn into_result(self) -> Result<Self, NewsError> {
        if self.is_ok() {
            return Ok(self);
        }
        Err(NewsError::NewsApi {
            code: self.code.unwrap_or_else(|| "unknown".to_string()),
            message: self.message.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    #[serde(default)]
    pub source: Option<ApiSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ApiArticle {
    /// Map to a storable row under `category`. Items without a url have no
    /// upsert key and yield `None`. A missing or unparsable `publishedAt`
    /// falls back to `fetched_at`.
    pub fn into_new_article(self, category: &str, fetched_at: DateTime<Utc>) -> Option<NewArticle> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let source = self.source.unwrap_or_default();
        let published_at = self
            .published_at
            .as_deref()
            .and_then(parse_published_at)
            .unwrap_or(fetched_at);

        Some(NewArticle {
            source_id: source.id,
            source_name: source.name.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            author: self.author,
            title: self.title.unwrap_or_else(|| UNTITLED.to_string()),
            description: self.description,
            url,
            url_to_image: self.url_to_image,
            published_at,
            content: self.content,
            category: category.to_string(),
        })
    }
}

fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Query string for `GET /top-headlines`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesParams<'a> {
    pub api_key: &'a str,
    pub category: &'a str,
    pub language: &'a str,
    pub country: &'a str,
    pub page_size: u32,
}

/// Query string for `GET /everything`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EverythingParams<'a> {
    pub api_key: &'a str,
    pub q: &'a str,
    pub language: &'a str,
    pub page_size: u32,
    pub sort_by: &'a str,
}
