use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::NewsError;

/// Integer article id from the `{id}` path segment.
/// Anything that is not an integer is a missing article, not a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleId(pub i64);

impl<S> FromRequestParts<S> for ArticleId
where
    S: Send + Sync,
{
    type Rejection = NewsError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| NewsError::NotFound("Article not found."))?;
        Ok(Self(id))
    }
}
