use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use tracing::warn;

use crate::config::BasicConfig;
use crate::db::NewsStorage;
use crate::handlers::admin::{admin_articles_handler, create_user_handler};
use crate::handlers::favorites::{history_handler, list_favorites_handler, toggle_favorite_handler};
use crate::handlers::news::{
    article_detail_handler, fetch_news_handler, home_handler, random_news_handler, search_handler,
};
use crate::service::news_service::NewsService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct NewsState {
    pub storage: NewsStorage,
    pub news: NewsService,
    pub admin_key: Arc<str>,
    pub insecure_cookie: bool,
    cookie_key: Key,
}

impl NewsState {
    pub fn new(storage: NewsStorage, news: NewsService, basic: &BasicConfig) -> Self {
        Self {
            storage,
            news,
            admin_key: Arc::from(basic.admin_key.as_str()),
            insecure_cookie: basic.insecure_cookie,
            cookie_key: cookie_key(basic.cookie_secret.as_deref()),
        }
    }
}

impl FromRef<NewsState> for Key {
    fn from_ref(state: &NewsState) -> Self {
        state.cookie_key.clone()
    }
}

fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            warn!(error = %e, "cookie_secret rejected (need at least 64 bytes); using a random key");
            Key::generate()
        }
        None => Key::generate(),
    }
}

pub fn news_router(state: NewsState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/random/", get(random_news_handler))
        .route("/article/{id}/", get(article_detail_handler))
        .route("/favorite/{id}/", post(toggle_favorite_handler))
        .route("/fetch-news/", get(fetch_news_handler))
        .route("/search/", get(search_handler))
        .route("/me/favorites/", get(list_favorites_handler))
        .route("/me/history/", get(history_handler))
        .route("/admin/articles/", get(admin_articles_handler))
        .route("/admin/users/", post(create_user_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
