//! Scrapes the CSRF token out of the club widget landing page.
//!
//! The page embeds its client config as a script of the form
//! `window.CHRONOGOLF_CONFIG = {...}`. Every private API call must echo
//! the `CSRF_TOKEN` from that blob in an `X-CSRF-Token` header.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{GolferError, Result};
use crate::types::AppConfig;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script regex is valid")
});

static CONFIG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*window\.CHRONOGOLF_CONFIG\s*=\s*(\{.*\})\s*;?\s*$")
        .expect("config regex is valid")
});

/// Find and decode the config blob in `html`.
///
/// Returns [`GolferError::ConfigNotFound`] when no script carries the blob
/// or when the blob has no CSRF token.
pub fn extract_app_config(html: &str) -> Result<AppConfig> {
    for script in SCRIPT_RE.captures_iter(html) {
        let Some(body) = script.get(1) else { continue };
        let Some(blob) = CONFIG_RE.captures(body.as_str()).and_then(|c| c.get(1)) else {
            continue;
        };
        let config: AppConfig = serde_json::from_str(blob.as_str())
            .map_err(|e| GolferError::Parse(format!("app config: {e}")))?;
        return match config.csrf_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(config),
            _ => Err(GolferError::ConfigNotFound),
        };
    }
    Err(GolferError::ConfigNotFound)
}
