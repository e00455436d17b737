use crate::api::newsapi::NewsApiClient;
use crate::config::NewsApiConfig;
use crate::db::{Article, NewsStorage};
use crate::error::NewsError;
use crate::types::newsapi::ApiArticle;
use crate::types::theme::{CULTURE_CATEGORY, Theme};
use chrono::Utc;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{error, info, warn};

/// NewsAPI category used for the generic culture feed.
const HEADLINES_CATEGORY: &str = "entertainment";

pub const CULTURE_PAGE_SIZE: u32 = 20;
pub const THEME_PAGE_SIZE: u32 = 30;
pub const SEARCH_PAGE_SIZE: u32 = 20;
/// Page size for the manual `/fetch-news/` action.
pub const MANUAL_FETCH_PAGE_SIZE: u32 = 30;

/// Featured articles are drawn from this many of the most recent ones.
pub const FEATURED_POOL: usize = 20;

/// Language/country/page size for a single fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchParams<'a> {
    pub language: &'a str,
    pub country: &'a str,
    pub page_size: u32,
}

/// Fetch news from NewsAPI and upsert it by url.
///
/// Every public fetch swallows failures: they are logged and reported as an
/// empty result, so callers just re-read the store.
#[derive(Clone)]
pub struct NewsService {
    api: NewsApiClient,
    storage: NewsStorage,
    language: String,
    country: String,
}

impl NewsService {
    pub fn new(api: NewsApiClient, storage: NewsStorage, cfg: &NewsApiConfig) -> Self {
        Self {
            api,
            storage,
            language: cfg.language.clone(),
            country: cfg.country.clone(),
        }
    }

    /// Configured language/country with the given page size.
    pub fn params(&self, page_size: u32) -> FetchParams<'_> {
        FetchParams {
            language: &self.language,
            country: &self.country,
            page_size,
        }
    }

    /// Entertainment top headlines, stored under the `culture` category.
    pub async fn fetch_culture_news(&self, params: FetchParams<'_>) -> Vec<Article> {
        let result: Result<Vec<Article>, NewsError> = async {
            let envelope = self
                .api
                .top_headlines(
                    HEADLINES_CATEGORY,
                    params.language,
                    params.country,
                    params.page_size,
                )
                .await?;
            info!(
                total_results = envelope.total_results.unwrap_or(0),
                "NewsAPI returned culture headlines"
            );
            self.save_articles(envelope.articles, CULTURE_CATEGORY).await
        }
        .await;
        swallow(result, "culture headlines")
    }

    /// `/everything` over the theme keywords, stored under the theme code.
    pub async fn fetch_news_by_theme(&self, theme: Theme, params: FetchParams<'_>) -> Vec<Article> {
        let result: Result<Vec<Article>, NewsError> = async {
            let envelope = self
                .api
                .everything(theme.keywords(), params.language, params.page_size)
                .await?;
            info!(
                theme = theme.code(),
                total_results = envelope.total_results.unwrap_or(0),
                "NewsAPI returned themed news"
            );
            self.save_articles(envelope.articles, theme.code()).await
        }
        .await;
        swallow(result, theme.code())
    }

    /// Free-text `/everything` search; results land in `culture`.
    pub async fn search_news(&self, query: &str, params: FetchParams<'_>) -> Vec<Article> {
        let result: Result<Vec<Article>, NewsError> = async {
            let envelope = self
                .api
                .everything(query, params.language, params.page_size)
                .await?;
            self.save_articles(envelope.articles, CULTURE_CATEGORY).await
        }
        .await;
        swallow(result, "search")
    }

    /// Upsert each item by url, skipping items without one. A row that fails
    /// to write is logged and left out of the result.
    pub async fn save_articles(
        &self,
        items: Vec<ApiArticle>,
        category: &str,
    ) -> Result<Vec<Article>, NewsError> {
        let fetched_at = Utc::now();
        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            let Some(new_article) = item.into_new_article(category, fetched_at) else {
                continue;
            };
            let url = new_article.url.clone();
            match self.storage.upsert_article(new_article).await {
                Ok(article) => saved.push(article),
                Err(e) => warn!(%url, error = %e, "failed to store article"),
            }
        }
        Ok(saved)
    }
}

fn swallow(result: Result<Vec<Article>, NewsError>, what: &str) -> Vec<Article> {
    match result {
        Ok(saved) => {
            info!(what, saved = saved.len(), "news fetch stored articles");
            saved
        }
        Err(e) => {
            error!(what, error = %e, "news fetch failed");
            Vec::new()
        }
    }
}

/// Pick the featured article uniformly among the first `FEATURED_POOL`
/// entries of a newest-first list.
pub fn pick_featured<'a, R: Rng + ?Sized>(
    articles: &'a [Article],
    rng: &mut R,
) -> Option<&'a Article> {
    let pool = &articles[..articles.len().min(FEATURED_POOL)];
    pool.choose(rng)
}
