use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Article;
use crate::middleware::article_id::ArticleId;
use crate::middleware::auth::MaybeUser;
use crate::middleware::flash::{FlashMessage, push_flash, take_flashes};
use crate::service::news_service::{
    CULTURE_PAGE_SIZE, FEATURED_POOL, MANUAL_FETCH_PAGE_SIZE, SEARCH_PAGE_SIZE, THEME_PAGE_SIZE,
    pick_featured,
};
use crate::types::theme::{CULTURE_CATEGORY, HOME_THEMES, ThemeChoice, ThemeFilter};
use crate::{NewsError, router::NewsState};

/// Articles listed under the featured one on the home page.
const HOME_LIST_SIZE: usize = 12;

/// Below this many culture articles, `/random/` tops up from NewsAPI first.
const RANDOM_MIN_POOL: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub theme: Option<String>,
    pub fetch: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured_article: Option<Article>,
    pub articles: Vec<Article>,
    pub themes: Vec<ThemeChoice>,
    /// The requested code, even when it fell back to `cultura`.
    pub selected_theme: String,
    pub messages: Vec<FlashMessage>,
}

/// GET / -> featured article plus latest articles for the selected theme.
pub async fn home_handler(
    State(state): State<NewsState>,
    Query(query): Query<HomeQuery>,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, NewsError> {
    let filter = ThemeFilter::parse(query.theme.as_deref());
    let force_fetch = query.fetch.as_deref().is_some_and(|v| !v.is_empty());
    let limit = Some(FEATURED_POOL as u32);

    let mut articles = state.storage.list_articles(filter.category(), limit).await?;

    if let ThemeFilter::Only(theme) = filter
        && (articles.is_empty() || force_fetch)
    {
        state
            .news
            .fetch_news_by_theme(theme, state.news.params(THEME_PAGE_SIZE))
            .await;
        articles = state.storage.list_articles(filter.category(), limit).await?;
    }

    let featured_article = {
        let mut rng = rand::rng();
        pick_featured(&articles, &mut rng).cloned()
    };
    let featured_id = featured_article.as_ref().map(|a| a.id);
    let others = articles
        .into_iter()
        .filter(|a| Some(a.id) != featured_id)
        .take(HOME_LIST_SIZE)
        .collect();

    let selected_theme = match filter {
        ThemeFilter::All => filter.code().to_string(),
        ThemeFilter::Only(theme) => query
            .theme
            .as_deref()
            .map(str::trim)
            .unwrap_or(theme.code())
            .to_string(),
    };

    let (jar, messages) = take_flashes(jar);
    let page = HomePage {
        featured_article,
        articles: others,
        themes: HOME_THEMES.to_vec(),
        selected_theme,
        messages,
    };
    Ok((jar, Json(page)))
}

#[derive(Debug, Serialize)]
pub struct RandomArticle {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
    pub source_name: String,
    /// `dd/mm/YYYY`
    pub published_at: String,
    pub author: String,
}

impl From<Article> for RandomArticle {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            url: a.url,
            url_to_image: a.url_to_image,
            source_name: a.source_name,
            published_at: a.published_at.format("%d/%m/%Y").to_string(),
            author: a.author.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// GET /random/ -> one random culture article.
pub async fn random_news_handler(
    State(state): State<NewsState>,
) -> Result<Json<RandomArticle>, NewsError> {
    let available = state.storage.count_articles(Some(CULTURE_CATEGORY)).await?;
    if available < RANDOM_MIN_POOL {
        state
            .news
            .fetch_culture_news(state.news.params(CULTURE_PAGE_SIZE))
            .await;
    }

    let article = state
        .storage
        .random_article(CULTURE_CATEGORY)
        .await?
        .ok_or(NewsError::NotFound("No articles found."))?;
    Ok(Json(article.into()))
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub is_favorite: bool,
}

/// GET /article/{id}/ -> article details; records read history when signed in.
pub async fn article_detail_handler(
    State(state): State<NewsState>,
    ArticleId(id): ArticleId,
    MaybeUser(user): MaybeUser,
) -> Result<Json<ArticleDetail>, NewsError> {
    let article = state
        .storage
        .get_article(id)
        .await?
        .ok_or(NewsError::NotFound("Article not found."))?;

    let is_favorite = match user {
        Some(user) => {
            state.storage.record_read(user.id, article.id).await?;
            state.storage.is_favorite(user.id, article.id).await?
        }
        None => false,
    };

    Ok(Json(ArticleDetail {
        article,
        is_favorite,
    }))
}

/// GET /fetch-news/ -> pull culture headlines, then back to the home page.
pub async fn fetch_news_handler(
    State(state): State<NewsState>,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    let saved = state
        .news
        .fetch_culture_news(state.news.params(MANUAL_FETCH_PAGE_SIZE))
        .await;

    let flash = if saved.is_empty() {
        FlashMessage::warning("No articles were found. Check your API key.")
    } else {
        info!(count = saved.len(), "manual fetch stored articles");
        FlashMessage::success(format!("{} articles fetched and saved.", saved.len()))
    };

    let jar = push_flash(jar, flash, !state.insecure_cookie);
    (jar, Redirect::to("/"))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /search/?q= -> keyword search against NewsAPI, stored and returned.
pub async fn search_handler(
    State(state): State<NewsState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Article>>, NewsError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| NewsError::InvalidArgument("missing `q`".to_string()))?;

    let saved = state
        .news
        .search_news(q, state.news.params(SEARCH_PAGE_SIZE))
        .await;
    Ok(Json(saved))
}
