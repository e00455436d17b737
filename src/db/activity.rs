use base64::Engine;
use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use super::models::{MarkedArticle, User};
use super::sqlite::{ARTICLE_COLUMNS, NewsStorage};
use crate::error::NewsError;

/// Outcome of flipping a (user, article) favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteToggle {
    Added,
    Removed,
}

impl FavoriteToggle {
    pub fn message(self) -> &'static str {
        match self {
            FavoriteToggle::Added => "Added to favorites",
            FavoriteToggle::Removed => "Removed from favorites",
        }
    }
}

impl NewsStorage {
    /// Create a user with a fresh random API token.
    pub async fn create_user(&self, username: &str) -> Result<User, NewsError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, api_token, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, api_token, created_at
            "#,
        )
        .bind(username)
        .bind(generate_token())
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;
        Ok(user)
    }

    pub async fn user_by_token(&self, token: &str) -> Result<Option<User>, NewsError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, api_token, created_at FROM users WHERE api_token = ?",
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    /// Get-or-create a read-history row. Returns true when the row is new;
    /// later reads of the same article leave the first `read_at` in place.
    pub async fn record_read(&self, user_id: i64, article_id: i64) -> Result<bool, NewsError> {
        let res = sqlx::query(
            r#"
            INSERT INTO read_history (user_id, article_id, read_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, article_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(article_id)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;
        Ok(res.rows_affected() == 1)
    }

    /// Remove the favorite if present, otherwise add it. Runs in one transaction.
    pub async fn toggle_favorite(
        &self,
        user_id: i64,
        article_id: i64,
    ) -> Result<FavoriteToggle, NewsError> {
        let mut tx = self.pool().begin().await?;

        let removed = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND article_id = ?")
            .bind(user_id)
            .bind(article_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let outcome = if removed > 0 {
            FavoriteToggle::Removed
        } else {
            sqlx::query(
                "INSERT INTO favorites (user_id, article_id, favorited_at) VALUES (?, ?, ?)",
            )
            .bind(user_id)
            .bind(article_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
            FavoriteToggle::Added
        };

        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn is_favorite(&self, user_id: i64, article_id: i64) -> Result<bool, NewsError> {
        let rec: (i64,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = ? AND article_id = ?)",
        )
        .bind(user_id)
        .bind(article_id)
        .fetch_one(self.pool())
        .await?;
        Ok(rec.0 != 0)
    }

    /// Most recently favorited first.
    pub async fn list_favorites(&self, user_id: i64) -> Result<Vec<MarkedArticle>, NewsError> {
        let sql = format!(
            r#"SELECT {ARTICLE_COLUMNS}, f.favorited_at AS marked_at
               FROM favorites f JOIN articles a ON a.id = f.article_id
               WHERE f.user_id = ?
               ORDER BY f.favorited_at DESC, f.id DESC"#
        );
        let rows = sqlx::query_as::<_, MarkedArticle>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }

    /// Most recently read first.
    pub async fn list_read_history(&self, user_id: i64) -> Result<Vec<MarkedArticle>, NewsError> {
        let sql = format!(
            r#"SELECT {ARTICLE_COLUMNS}, h.read_at AS marked_at
               FROM read_history h JOIN articles a ON a.id = h.article_id
               WHERE h.user_id = ?
               ORDER BY h.read_at DESC, h.id DESC"#
        );
        let rows = sqlx::query_as::<_, MarkedArticle>(&sql)
            .bind(user_id)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
