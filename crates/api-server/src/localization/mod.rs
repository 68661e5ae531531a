//! Active-language resolution and language-change invalidation.

pub mod cache;

pub use cache::ContentCache;

use std::sync::RwLock;
use tracing::info;

/// Two-letter language code from a locale tag ("pl-PL" -> "pl").
/// Anything shorter than two letters falls back to the default.
pub fn resolve_language(locale: &str, default: &str) -> String {
    let code: String = locale
        .chars()
        .take(2)
        .flat_map(|c| c.to_lowercase())
        .collect();
    if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        code
    } else {
        default.to_string()
    }
}

/// Shared localization context: the persisted language selection and
/// the cache it invalidates. Language changes never cancel in-flight
/// fetches; a stale-language result is superseded by the next
/// invalidated re-fetch.
pub struct LocalizationContext {
    default_language: String,
    supported_languages: Vec<String>,
    current: RwLock<String>,
    cache: ContentCache,
}

impl LocalizationContext {
    pub fn new(default_language: String, supported_languages: Vec<String>) -> Self {
        let current = RwLock::new(default_language.clone());
        Self {
            default_language,
            supported_languages,
            current,
            cache: ContentCache::new(),
        }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn current_language(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Resolve a raw locale tag against the supported set; unsupported
    /// languages fall back to the default.
    pub fn resolve(&self, locale: &str) -> String {
        let code = resolve_language(locale, &self.default_language);
        if self.supported_languages.iter().any(|l| l == &code) {
            code
        } else {
            self.default_language.clone()
        }
    }

    /// Persist a new language selection and invalidate all cached
    /// language-dependent content. A no-op when the resolved language
    /// is already active.
    pub fn set_language(&self, locale: &str) -> String {
        let code = self.resolve(locale);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if *current != code {
            info!("Language changed: {} -> {}", current, code);
            *current = code.clone();
            self.cache.invalidate_all();
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> LocalizationContext {
        LocalizationContext::new(
            "pl".to_string(),
            vec!["pl".to_string(), "en".to_string(), "de".to_string()],
        )
    }

    #[test]
    fn locale_tag_truncates_to_two_letters() {
        assert_eq!(resolve_language("pl-PL", "pl"), "pl");
        assert_eq!(resolve_language("EN-us", "pl"), "en");
        assert_eq!(resolve_language("de", "pl"), "de");
    }

    #[test]
    fn malformed_locale_falls_back() {
        assert_eq!(resolve_language("", "pl"), "pl");
        assert_eq!(resolve_language("7", "pl"), "pl");
    }

    #[test]
    fn unsupported_language_falls_back_to_default() {
        assert_eq!(context().resolve("fr-FR"), "pl");
    }

    #[test]
    fn language_change_invalidates_cache() {
        let ctx = context();
        ctx.cache().set("services", "pl", json!([1]));

        ctx.set_language("en-US");
        assert_eq!(ctx.current_language(), "en");
        assert_eq!(ctx.cache().get("services", "pl"), None);
    }

    #[test]
    fn same_language_keeps_cache() {
        let ctx = context();
        ctx.cache().set("services", "pl", json!([1]));

        ctx.set_language("pl-PL");
        assert_eq!(ctx.cache().get("services", "pl"), Some(json!([1])));
    }
}
