use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{Article, ArticleQuery};
use crate::middleware::auth::RequireAdminKey;
use crate::{NewsError, router::NewsState};

/// GET /admin/articles/?category=&source=&q=&limit=
pub async fn admin_articles_handler(
    State(state): State<NewsState>,
    _admin: RequireAdminKey,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, NewsError> {
    Ok(Json(state.storage.search_articles(&query).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: i64,
    pub username: String,
    pub api_token: String,
}

/// POST /admin/users/ -> create a user and hand back its API token once.
pub async fn create_user_handler(
    State(state): State<NewsState>,
    _admin: RequireAdminKey,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUser>), NewsError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(NewsError::InvalidArgument("username must not be empty".to_string()));
    }

    let user = state.storage.create_user(username).await.map_err(|e| {
        if e.is_unique_violation() {
            NewsError::Conflict(format!("username `{username}` already exists"))
        } else {
            e
        }
    })?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUser {
            id: user.id,
            username: user.username,
            api_token: user.api_token,
        }),
    ))
}
