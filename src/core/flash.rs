//! One-shot notices carried across a redirect
//!
//! A handler returns a [`Redirect`] optionally holding a [`Notice`]. At the
//! HTTP boundary the notice becomes a short-lived cookie which the next
//! rendered view consumes. The cookie only stores the message key and
//! count; translation happens when the view is rendered.

use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::core::i18n::Translator;

/// A localized message to show on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub key: String,
    pub count: Option<usize>,
}

impl Notice {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count: None,
        }
    }

    pub fn with_count(key: impl Into<String>, count: usize) -> Self {
        Self {
            key: key.into(),
            count: Some(count),
        }
    }

    /// Cookie payload: `key` or `key:count`
    pub fn encode(&self) -> String {
        match self.count {
            Some(count) => format!("{}:{}", self.key, count),
            None => self.key.clone(),
        }
    }

    /// Inverse of [`Notice::encode`]; rejects anything outside `[a-z0-9_]`
    pub fn decode(raw: &str) -> Option<Self> {
        let (key, count) = match raw.split_once(':') {
            Some((key, count)) => (key, Some(count.parse().ok()?)),
            None => (raw, None),
        };

        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        valid.then(|| Notice {
            key: key.to_string(),
            count,
        })
    }

    pub fn translate(&self, translator: &Translator) -> String {
        match self.count {
            Some(count) => translator.trans(&self.key, &[("count", &count.to_string())]),
            None => translator.trans(&self.key, &[]),
        }
    }
}

/// Flash cookie settings
#[derive(Debug, Clone)]
pub struct FlashCookie {
    pub name: String,
}

impl FlashCookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Read the pending notice from the request cookies
    pub fn read(&self, headers: &HeaderMap) -> Option<Notice> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| Notice::decode(value))
    }

    pub fn set(&self, notice: &Notice) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.name,
            notice.encode()
        ))
        .ok()
    }

    /// Expire the cookie once its notice has been shown
    pub fn clear(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            self.name
        ))
        .ok()
    }
}

impl Default for FlashCookie {
    fn default() -> Self {
        Self::new("flash_message")
    }
}

/// A `303 See Other` redirect, optionally flashing a notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub notice: Option<Notice>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Option<Notice>) -> Self {
        self.notice = notice;
        self
    }

    /// Attach the cookie settings needed to turn this into a response
    pub fn into_flash_response(self, cookie: &FlashCookie) -> FlashRedirect {
        FlashRedirect {
            redirect: self,
            cookie: cookie.clone(),
        }
    }
}

/// A [`Redirect`] bound to the flash cookie configuration
pub struct FlashRedirect {
    redirect: Redirect,
    cookie: FlashCookie,
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.redirect.location) {
            Ok(location) => {
                headers.insert(LOCATION, location);
            }
            Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
        if let Some(cookie) = self
            .redirect
            .notice
            .as_ref()
            .and_then(|notice| self.cookie.set(notice))
        {
            headers.insert(SET_COOKIE, cookie);
        }
        (StatusCode::SEE_OTHER, headers).into_response()
    }
}
