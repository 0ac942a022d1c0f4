//! OAuth and email-confirmation redirect callbacks.
//!
//! Both flows end in a browser redirect: to the requested `next` path on
//! success, to a configured error page otherwise.

use std::collections::HashMap;

use serde::Serialize;

use crate::{AuthConfig, AuthProvider, OtpType};

/// Target of a callback redirect (absolute URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
}

impl Redirect {
    fn to(config: &AuthConfig, path: &str) -> Self {
        Self {
            location: config.url_for(path),
        }
    }
}

/// Decoded `application/x-www-form-urlencoded` query string.
///
/// The first occurrence of a repeated key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    params: HashMap<String, String>,
}

impl CallbackQuery {
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self { params }
    }

    /// Value of `key`, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// The post-login destination, restricted to same-origin paths.
    pub fn next_path(&self) -> &str {
        safe_next_path(self.get("next"))
    }
}

/// Only same-origin absolute paths are honoured; anything else is `/`.
///
/// `//host` and `/\host` are protocol-relative in browsers, so they are
/// rejected along with absolute URLs. Decoded control characters (CR/LF in
/// particular) never reach a `Location` header.
pub fn safe_next_path(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => "/",
    }
}

/// `/auth/callback?code=...&next=...`
pub fn handle_oauth_callback<A>(provider: &A, config: &AuthConfig, query: &str) -> Redirect
where
    A: AuthProvider + ?Sized,
{
    let query = CallbackQuery::parse(query);
    let next = query.next_path();

    let Some(code) = query.get("code") else {
        tracing::warn!("oauth callback without code");
        return Redirect::to(config, config.auth_error_path());
    };

    if provider.exchange_code_for_session(code) {
        tracing::info!(next = %next, "oauth code exchanged");
        Redirect::to(config, next)
    } else {
        tracing::warn!("oauth code exchange failed");
        Redirect::to(config, config.auth_error_path())
    }
}

/// `/auth/confirm?token_hash=...&type=...&next=...`
pub fn handle_email_confirmation<A>(provider: &A, config: &AuthConfig, query: &str) -> Redirect
where
    A: AuthProvider + ?Sized,
{
    let query = CallbackQuery::parse(query);
    let next = query.next_path();

    let (Some(token_hash), Some(kind)) = (query.get("token_hash"), query.get("type")) else {
        tracing::warn!("email confirmation without token_hash or type");
        return Redirect::to(config, config.error_path());
    };

    let kind: OtpType = match kind.parse() {
        Ok(kind) => kind,
        Err(err) => {
            tracing::warn!(error = %err, "email confirmation rejected");
            return Redirect::to(config, config.error_path());
        }
    };

    if provider.verify_otp(token_hash, kind) {
        tracing::info!(kind = %kind, next = %next, "email confirmation verified");
        Redirect::to(config, next)
    } else {
        tracing::warn!(kind = %kind, "email confirmation failed");
        Redirect::to(config, config.error_path())
    }
}
