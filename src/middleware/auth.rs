use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use headers::authorization::Bearer;
use headers::{Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::db::User;
use crate::error::NewsError;
use crate::router::NewsState;

/// The caller resolved from `Authorization: Bearer <api_token>`, if any.
/// Unknown tokens are treated as anonymous, never as an error.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<NewsState> for MaybeUser {
    type Rejection = NewsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &NewsState,
    ) -> Result<Self, Self::Rejection> {
        let Some(auth) = parts.headers.typed_get::<Authorization<Bearer>>() else {
            return Ok(Self(None));
        };
        let user = state.storage.user_by_token(auth.token()).await?;
        Ok(Self(user))
    }
}

/// Like [`MaybeUser`] but rejects anonymous callers with 401.
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<NewsState> for RequireUser {
    type Rejection = NewsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &NewsState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(Self(user)),
            MaybeUser(None) => Err(NewsError::Unauthorized),
        }
    }
}

/// Ensure the inbound request carries the admin key.
/// Accepts either:
/// - Header: `x-admin-key: ...`
/// - Query string: `?key=...`
pub fn ensure_admin(
    headers: &HeaderMap,
    query: Option<&str>,
    expected: &str,
) -> Result<(), NewsError> {
    if expected.is_empty() {
        return Err(NewsError::Unauthorized);
    }

    let is_match =
        |candidate: &str| bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()));

    if let Some(hv) = headers.get("x-admin-key").and_then(|v| v.to_str().ok())
        && is_match(hv)
    {
        return Ok(());
    }

    if let Some(qs) = query {
        for (k, v) in url::form_urlencoded::parse(qs.as_bytes()) {
            if k == "key" && is_match(v.as_ref()) {
                return Ok(());
            }
        }
    }

    Err(NewsError::Unauthorized)
}

#[derive(Debug, Clone, Copy)]
pub struct RequireAdminKey;

impl FromRequestParts<NewsState> for RequireAdminKey {
    type Rejection = NewsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &NewsState,
    ) -> Result<Self, Self::Rejection> {
        ensure_admin(&parts.headers, parts.uri.query(), &state.admin_key)?;
        Ok(Self)
    }
}
