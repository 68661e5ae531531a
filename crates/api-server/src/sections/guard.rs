//! Route gating: direct navigation to a section's dedicated route
//! honors the same visibility flag as the landing-page listing.

use super::settings::SettingsState;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Gated route paths and their section keys. The root path is never
/// listed here, so a redirect cannot loop.
static GATED_PATHS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("/services", "services"),
        ("/why-us", "why-us"),
        ("/blog", "blog"),
        ("/shop", "shop"),
        ("/portfolio", "case-studies"),
    ])
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectHome,
}

/// Section key a path is gated by, if any.
pub fn section_key_for_path(path: &str) -> Option<&'static str> {
    GATED_PATHS.get(path).copied()
}

/// Re-evaluated on every navigation and on every settings change.
/// Unmapped paths are never gated.
pub fn check(path: &str, settings: &SettingsState) -> GuardDecision {
    match section_key_for_path(path) {
        Some(key) if !settings.is_visible(key) => GuardDecision::RedirectHome,
        _ => GuardDecision::Allow,
    }
}
