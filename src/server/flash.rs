//! One-shot flash messages carried in a cookie.
//!
//! A handler that redirects stores its notice with [`push`]; the next handler
//! that renders a page consumes everything pending with [`take`], which also
//! clears the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE_NAME: &str = "pictura_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }
}

/// Encode messages as a cookie value.
pub fn encode(messages: &[FlashMessage]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(messages)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a cookie value. Malformed values yield `None`.
pub fn decode(value: &str) -> Option<Vec<FlashMessage>> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}

fn pending(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE_NAME)
        .and_then(|c| decode(c.value()))
        .unwrap_or_default()
}

/// Remove and return all pending messages.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    let messages = pending(&jar);
    if jar.get(FLASH_COOKIE_NAME).is_none() {
        return (jar, messages);
    }
    let removal = Cookie::build((FLASH_COOKIE_NAME, "")).path("/");
    (jar.remove(removal), messages)
}

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, message: FlashMessage) -> CookieJar {
    let mut messages = pending(&jar);
    messages.push(message);

    let value = match encode(&messages) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode flash messages");
            return jar;
        }
    };

    let cookie = Cookie::build((FLASH_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}
