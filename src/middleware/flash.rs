//! One-shot notices carried across a redirect in a private (encrypted) cookie.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

const FLASH_COOKIE: &str = "news_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }
}

/// Queue `msg` behind any messages not yet shown.
pub fn push_flash(jar: PrivateCookieJar, msg: FlashMessage, secure: bool) -> PrivateCookieJar {
    let mut pending = read_flashes(&jar);
    pending.push(msg);
    match serde_json::to_string(&pending) {
        Ok(value) => jar.add(build_cookie(value, secure)),
        Err(e) => {
            debug!(error = %e, "dropping unserializable flash message");
            jar
        }
    }
}

/// Drain pending messages; the cookie is cleared in the returned jar.
pub fn take_flashes(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<FlashMessage>) {
    let pending = read_flashes(&jar);
    if pending.is_empty() && jar.get(FLASH_COOKIE).is_none() {
        return (jar, pending);
    }
    (jar.remove(clear_cookie()), pending)
}

fn read_flashes(jar: &PrivateCookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

fn build_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE, ""))
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Key;

    #[test]
    fn pushed_messages_are_taken_once_in_order() {
        let jar = PrivateCookieJar::new(Key::generate());
        let jar = push_flash(jar, FlashMessage::success("first"), true);
        let jar = push_flash(jar, FlashMessage::warning("second"), true);

        let (jar, taken) = take_flashes(jar);
        assert_eq!(
            taken,
            vec![FlashMessage::success("first"), FlashMessage::warning("second")]
        );

        let (_, again) = take_flashes(jar);
        assert!(again.is_empty());
    }
}
