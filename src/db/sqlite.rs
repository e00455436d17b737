use crate::db::models::{Article, ArticleQuery, NewArticle};
use crate::db::schema::SQLITE_INIT;
use crate::error::NewsError;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

pub type SqlitePool = Pool<Sqlite>;

/// Column list for `SELECT ... FROM articles a`.
pub(crate) const ARTICLE_COLUMNS: &str = "a.id, a.source_id, a.source_name, a.author, a.title, \
     a.description, a.url, a.url_to_image, a.published_at, a.content, a.category, \
     a.created_at, a.updated_at";

const ARTICLE_RETURNING: &str = "id, source_id, source_name, author, title, description, url, \
     url_to_image, published_at, content, category, created_at, updated_at";

const DEFAULT_QUERY_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct NewsStorage {
    pool: SqlitePool,
}

impl NewsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url`, creating the file if missing.
    ///
    /// In-memory databases are pinned to a single connection that never
    /// expires, otherwise each pooled connection would see its own empty db.
    pub async fn connect(database_url: &str) -> Result<Self, NewsError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let mut pool_opts = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = pool_opts.connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), NewsError> {
        // sqlx::query runs a single statement, so split the script
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Upsert by unique url and return the stored row.
    /// `created_at` survives updates; everything else is overwritten.
    pub async fn upsert_article(&self, article: NewArticle) -> Result<Article, NewsError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO articles (
                source_id, source_name, author, title, description, url,
                url_to_image, published_at, content, category, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(url) DO UPDATE SET
                source_id=excluded.source_id,
                source_name=excluded.source_name,
                author=excluded.author,
                title=excluded.title,
                description=excluded.description,
                url_to_image=excluded.url_to_image,
                published_at=excluded.published_at,
                content=excluded.content,
                category=excluded.category,
                updated_at=excluded.updated_at
            RETURNING {ARTICLE_RETURNING}
            "#
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(article.source_id)
            .bind(article.source_name)
            .bind(article.author)
            .bind(article.title)
            .bind(article.description)
            .bind(article.url)
            .bind(article.url_to_image)
            .bind(article.published_at)
            .bind(article.content)
            .bind(article.category)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get_article(&self, id: i64) -> Result<Option<Article>, NewsError> {
        let sql = format!("SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.id = ?");
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Newest first. `category = None` lists everything; `limit = None` is unbounded.
    pub async fn list_articles(
        &self,
        category: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Article>, NewsError> {
        let sql = format!(
            r#"SELECT {ARTICLE_COLUMNS} FROM articles a
               WHERE (? IS NULL OR a.category = ?)
               ORDER BY a.published_at DESC, a.id DESC
               LIMIT ?"#
        );
        let rows = sqlx::query_as::<_, Article>(&sql)
            .bind(category)
            .bind(category)
            .bind(limit.map(i64::from).unwrap_or(-1))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count_articles(&self, category: Option<&str>) -> Result<i64, NewsError> {
        let rec: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM articles WHERE (? IS NULL OR category = ?)")
                .bind(category)
                .bind(category)
                .fetch_one(&self.pool)
                .await?;
        Ok(rec.0)
    }

    /// Uniformly random article within `category`, if any.
    pub async fn random_article(&self, category: &str) -> Result<Option<Article>, NewsError> {
        let sql = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.category = ? ORDER BY RANDOM() LIMIT 1"
        );
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(category)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn search_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, NewsError> {
        let pattern = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);
        let sql = format!(
            r#"SELECT {ARTICLE_COLUMNS} FROM articles a
               WHERE (? IS NULL OR a.category = ?)
                 AND (? IS NULL OR a.source_name = ?)
                 AND (? IS NULL
                      OR a.title LIKE ? ESCAPE '\'
                      OR a.description LIKE ? ESCAPE '\'
                      OR a.author LIKE ? ESCAPE '\')
               ORDER BY a.published_at DESC, a.id DESC
               LIMIT ?"#
        );
        let rows = sqlx::query_as::<_, Article>(&sql)
            .bind(query.category.as_deref())
            .bind(query.category.as_deref())
            .bind(query.source.as_deref())
            .bind(query.source.as_deref())
            .bind(pattern.as_deref())
            .bind(pattern.as_deref())
            .bind(pattern.as_deref())
            .bind(pattern.as_deref())
            .bind(i64::from(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT)))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for ch in q.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    pub(crate) async fn memory_storage() -> NewsStorage {
        let storage = NewsStorage::connect("sqlite::memory:").await.unwrap();
        storage.init_schema().await.unwrap();
        storage
    }

    pub(crate) fn new_article(url: &str, category: &str, published: DateTime<Utc>) -> NewArticle {
        NewArticle {
            source_id: Some("bbc-news".to_string()),
            source_name: "BBC News".to_string(),
            author: Some("Jane Doe".to_string()),
            title: format!("Headline for {url}"),
            description: Some("A description".to_string()),
            url: url.to_string(),
            url_to_image: None,
            published_at: published,
            content: None,
            category: category.to_string(),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn upsert_same_url_keeps_one_row_with_latest_fields() {
        let storage = memory_storage().await;
        let first = storage
            .upsert_article(new_article("https://example.com/a", "culture", day(1)))
            .await
            .unwrap();

        let mut updated = new_article("https://example.com/a", "cinema", day(2));
        updated.title = "Updated title".to_string();
        let second = storage.upsert_article(updated).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.title, "Updated title");
        assert_eq!(second.category, "cinema");
        assert_eq!(second.published_at, day(2));
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(storage.count_articles(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_filters_by_category_newest_first() {
        let storage = memory_storage().await;
        for (url, cat, d) in [
            ("https://example.com/1", "cinema", 1),
            ("https://example.com/2", "musica", 2),
            ("https://example.com/3", "cinema", 3),
        ] {
            storage.upsert_article(new_article(url, cat, day(d))).await.unwrap();
        }

        let cinema = storage.list_articles(Some("cinema"), None).await.unwrap();
        let urls: Vec<_> = cinema.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/3", "https://example.com/1"]);

        let all = storage.list_articles(None, Some(2)).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].url, "https://example.com/3");
        assert_eq!(storage.count_articles(Some("musica")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn random_article_stays_within_category() {
        let storage = memory_storage().await;
        assert!(storage.random_article("culture").await.unwrap().is_none());

        storage
            .upsert_article(new_article("https://example.com/c", "culture", day(1)))
            .await
            .unwrap();
        storage
            .upsert_article(new_article("https://example.com/t", "teatro", day(2)))
            .await
            .unwrap();

        for _ in 0..5 {
            let picked = storage.random_article("culture").await.unwrap().unwrap();
            assert_eq!(picked.url, "https://example.com/c");
        }
    }

    #[tokio::test]
    async fn search_matches_text_case_insensitively_and_escapes_wildcards() {
        let storage = memory_storage().await;
        let mut a = new_article("https://example.com/x", "arte", day(1));
        a.title = "Museum opens new wing".to_string();
        storage.upsert_article(a).await.unwrap();
        let mut b = new_article("https://example.com/y", "arte", day(2));
        b.title = "100% sold out".to_string();
        b.source_name = "Guardian".to_string();
        storage.upsert_article(b).await.unwrap();

        let hits = storage
            .search_articles(&ArticleQuery {
                q: Some("museum".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://example.com/x");

        let hits = storage
            .search_articles(&ArticleQuery {
                q: Some("0%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://example.com/y");

        let hits = storage
            .search_articles(&ArticleQuery {
                source: Some("Guardian".to_string()),
                category: Some("arte".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn like_pattern_escapes_special_chars() {
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
    }
}
