use axum::{
    Json,
    extract::State,
};
use serde::Serialize;

use crate::db::{FavoriteToggle, MarkedArticle};
use crate::middleware::article_id::ArticleId;
use crate::middleware::auth::RequireUser;
use crate::{NewsError, router::NewsState};

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub status: FavoriteToggle,
    pub message: &'static str,
}

/// POST /favorite/{id}/ -> add the favorite, or remove it if already present.
pub async fn toggle_favorite_handler(
    State(state): State<NewsState>,
    RequireUser(user): RequireUser,
    ArticleId(id): ArticleId,
) -> Result<Json<ToggleResponse>, NewsError> {
    let article = state
        .storage
        .get_article(id)
        .await?
        .ok_or(NewsError::NotFound("Article not found."))?;

    let status = state.storage.toggle_favorite(user.id, article.id).await?;
    tracing::debug!(user = %user.username, article = article.id, ?status, "favorite toggled");
    Ok(Json(ToggleResponse {
        status,
        message: status.message(),
    }))
}

/// GET /me/favorites/
pub async fn list_favorites_handler(
    State(state): State<NewsState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<MarkedArticle>>, NewsError> {
    Ok(Json(state.storage.list_favorites(user.id).await?))
}

/// GET /me/history/
pub async fn history_handler(
    State(state): State<NewsState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<MarkedArticle>>, NewsError> {
    Ok(Json(state.storage.list_read_history(user.id).await?))
}
