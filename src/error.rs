use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum NewsError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("NewsAPI error ({code}): {message}")]
    NewsApi { code: String, message: String },

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl NewsError {
    /// True when the error came from the database rejecting a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, NewsError::DatabaseError(SqlxError::Database(db)) if db.is_unique_violation())
    }
}

impl IntoResponse for NewsError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            NewsError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: what.to_string(),
                },
            ),
            NewsError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "User not authenticated.".to_string(),
                },
            ),
            NewsError::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_ARGUMENT".to_string(),
                    message: msg,
                },
            ),
            NewsError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message: msg,
                },
            ),
            NewsError::DatabaseError(_) | NewsError::Json(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
            NewsError::Reqwest(_) | NewsError::UrlParse(_) | NewsError::NewsApi { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "News provider is unavailable.".to_string(),
                },
            ),
            NewsError::UpstreamStatus(code) => {
                let (err_code, msg) = match code {
                    StatusCode::TOO_MANY_REQUESTS => {
                        ("RATE_LIMIT", "News provider rate limit exceeded.")
                    }
                    StatusCode::UNAUTHORIZED => {
                        ("UPSTREAM_UNAUTHORIZED", "News provider rejected the API key.")
                    }
                    _ => ("UPSTREAM_ERROR", "An upstream error occurred."),
                };
                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody {
                        code: err_code.to_string(),
                        message: msg.to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: NewsError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_message() {
        let (status, body) = render(NewsError::NotFound("No articles found.")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "No articles found.");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        let (status, body) = render(NewsError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn upstream_failures_are_bad_gateway() {
        let (status, body) =
            render(NewsError::UpstreamStatus(StatusCode::TOO_MANY_REQUESTS)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "RATE_LIMIT");

        let (status, _) = render(NewsError::NewsApi {
            code: "apiKeyInvalid".into(),
            message: "bad key".into(),
        })
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
