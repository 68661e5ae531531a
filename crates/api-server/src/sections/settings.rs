//! Section-settings resolution.
//!
//! Visibility policy, in one place:
//!
//! | query                     | loading / failed | key absent | known, disabled | known, enabled |
//! |---------------------------|------------------|------------|-----------------|----------------|
//! | `is_visible`              | true             | true       | false           | true           |
//! | `is_visible_in_menu`      | true             | true       | false           | `show_in_menu` |
//! | `sorted_visible_sections` | empty            | —          | excluded        | included       |
//!
//! Boolean checks fail open so a transient fetch error never hides a
//! working page; the composed list fails closed so the landing page
//! never renders in an undefined order.

use crate::database::{Repository, SectionSetting};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Port for the settings fetch, so the resolver does not care where
/// the collection comes from.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn load_settings(&self) -> anyhow::Result<Vec<SectionSetting>>;
}

#[async_trait]
impl SettingsSource for Repository {
    async fn load_settings(&self) -> anyhow::Result<Vec<SectionSetting>> {
        self.list_section_settings().await
    }
}

/// Lifecycle of the settings fetch. `Failed` means "settings unknown":
/// no data has ever been loaded successfully.
#[derive(Debug, Clone, Default)]
pub enum SettingsState {
    #[default]
    Loading,
    Loaded(Vec<SectionSetting>),
    Failed,
}

impl SettingsState {
    fn find(&self, key: &str) -> Option<&SectionSetting> {
        match self {
            SettingsState::Loaded(settings) => {
                settings.iter().find(|s| s.section_key == key)
            }
            _ => None,
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        match self {
            SettingsState::Loaded(_) => {
                self.find(key).map(|s| s.is_enabled).unwrap_or(true)
            }
            // Settings unknown: fail open.
            _ => true,
        }
    }

    pub fn is_visible_in_menu(&self, key: &str) -> bool {
        match self {
            SettingsState::Loaded(_) => match self.find(key) {
                // Disabled overrides the menu flag.
                Some(s) if !s.is_enabled => false,
                Some(s) => s.show_in_menu,
                None => true,
            },
            _ => true,
        }
    }

    pub fn sorted_visible_sections(&self) -> Vec<SectionSetting> {
        match self {
            SettingsState::Loaded(settings) => {
                let mut visible: Vec<SectionSetting> = settings
                    .iter()
                    .filter(|s| s.is_enabled)
                    .cloned()
                    .collect();
                // Stable: equal display_order keeps collection order.
                visible.sort_by_key(|s| s.display_order);
                visible
            }
            // Settings unknown: fail closed.
            _ => Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, SettingsState::Loaded(_))
    }
}

/// Shared settings context, passed down to the guard, the composition
/// engine, and the menu handlers. Refreshed in full, never mutated
/// piecemeal.
pub struct SectionSettingsResolver {
    source: Arc<dyn SettingsSource>,
    state: RwLock<SettingsState>,
}

impl SectionSettingsResolver {
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        Self {
            source,
            state: RwLock::new(SettingsState::Loading),
        }
    }

    /// Re-fetch the full settings collection. A failed refresh keeps
    /// the last-known-good data; only a failure with nothing loaded
    /// yet leaves the resolver in the unknown state.
    pub async fn refresh(&self) {
        match self.source.load_settings().await {
            Ok(settings) => {
                info!("Section settings refreshed ({} records)", settings.len());
                *self.state.write().unwrap_or_else(|e| e.into_inner()) =
                    SettingsState::Loaded(settings);
            }
            Err(e) => {
                warn!("Section settings fetch failed: {}", e);
                let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
                if !state.is_loaded() {
                    *state = SettingsState::Failed;
                }
            }
        }
    }

    /// Snapshot for a read path. While settings are still unknown the
    /// fetch is retried first, so a failed startup load heals on the
    /// next read instead of pinning every page to the degraded state.
    pub async fn ensure_loaded(&self) -> SettingsState {
        if !self.snapshot().is_loaded() {
            self.refresh().await;
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SettingsState {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_visible(key)
    }

    pub fn is_visible_in_menu(&self, key: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_visible_in_menu(key)
    }

    pub fn sorted_visible_sections(&self) -> Vec<SectionSetting> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .sorted_visible_sections()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn setting(key: &str, order: i32, enabled: bool, in_menu: bool) -> SectionSetting {
        SectionSetting {
            id: order,
            section_key: key.to_string(),
            display_name: key.to_string(),
            is_enabled: enabled,
            show_in_menu: in_menu,
            display_order: order,
            metadata: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn absent_key_is_visible_in_every_state() {
        for state in [
            SettingsState::Loading,
            SettingsState::Failed,
            SettingsState::Loaded(vec![setting("services", 0, true, true)]),
        ] {
            assert!(state.is_visible("no-such-section"));
            assert!(state.is_visible_in_menu("no-such-section"));
        }
    }

    #[test]
    fn disabled_overrides_menu_flag() {
        let state = SettingsState::Loaded(vec![setting("blog", 0, false, true)]);
        assert!(!state.is_visible("blog"));
        assert!(!state.is_visible_in_menu("blog"));
    }

    #[test]
    fn menu_flag_respected_when_enabled() {
        let state = SettingsState::Loaded(vec![
            setting("blog", 0, true, false),
            setting("shop", 1, true, true),
        ]);
        assert!(state.is_visible("blog"));
        assert!(!state.is_visible_in_menu("blog"));
        assert!(state.is_visible_in_menu("shop"));
    }

    #[test]
    fn sorted_list_filters_and_orders() {
        let state = SettingsState::Loaded(vec![
            setting("a", 2, true, true),
            setting("b", 1, true, true),
            setting("c", 0, false, true),
        ]);
        let keys: Vec<String> = state
            .sorted_visible_sections()
            .into_iter()
            .map(|s| s.section_key)
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn loading_fails_closed_for_list_and_open_for_booleans() {
        let state = SettingsState::Loading;
        assert!(state.sorted_visible_sections().is_empty());
        assert!(state.is_visible("blog"));

        let state = SettingsState::Failed;
        assert!(state.sorted_visible_sections().is_empty());
        assert!(state.is_visible("blog"));
    }

    struct StubSource {
        result: std::sync::Mutex<Vec<anyhow::Result<Vec<SectionSetting>>>>,
    }

    impl StubSource {
        fn new(results: Vec<anyhow::Result<Vec<SectionSetting>>>) -> Self {
            Self {
                result: std::sync::Mutex::new(results),
            }
        }
    }

    #[async_trait]
    impl SettingsSource for StubSource {
        async fn load_settings(&self) -> anyhow::Result<Vec<SectionSetting>> {
            self.result.lock().unwrap().remove(0)
        }
    }

    #[tokio::test]
    async fn initial_fetch_failure_leaves_settings_unknown() {
        let source = Arc::new(StubSource::new(vec![Err(anyhow::anyhow!("down"))]));
        let resolver = SectionSettingsResolver::new(source);
        resolver.refresh().await;

        assert!(resolver.is_visible("blog"));
        assert!(resolver.sorted_visible_sections().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_last_known_good() {
        let source = Arc::new(StubSource::new(vec![
            Ok(vec![setting("blog", 0, false, true)]),
            Err(anyhow::anyhow!("down")),
        ]));
        let resolver = SectionSettingsResolver::new(source);

        resolver.refresh().await;
        assert!(!resolver.is_visible("blog"));

        resolver.refresh().await;
        assert!(!resolver.is_visible("blog"));
    }

    #[tokio::test]
    async fn read_after_failed_startup_fetch_retries_and_heals() {
        let source = Arc::new(StubSource::new(vec![
            Err(anyhow::anyhow!("down")),
            Ok(vec![setting("blog", 0, true, true)]),
        ]));
        let resolver = SectionSettingsResolver::new(source);

        // Startup fetch fails; reads see the unknown state.
        resolver.refresh().await;
        assert!(resolver.sorted_visible_sections().is_empty());

        // The next read retries and recovers.
        let state = resolver.ensure_loaded().await;
        assert!(state.is_loaded());
        assert_eq!(state.sorted_visible_sections().len(), 1);
    }

    #[tokio::test]
    async fn loaded_state_is_not_refetched_per_read() {
        // A second fetch would panic the stub, so three reads passing
        // proves ensure_loaded leaves a loaded resolver alone.
        let source = Arc::new(StubSource::new(vec![Ok(vec![setting(
            "blog", 0, true, true,
        )])]));
        let resolver = SectionSettingsResolver::new(source);

        for _ in 0..3 {
            assert!(resolver.ensure_loaded().await.is_loaded());
        }
    }

    #[test]
    fn equal_order_keeps_collection_order() {
        let state = SettingsState::Loaded(vec![
            setting("x", 1, true, true),
            setting("y", 1, true, true),
        ]);
        let keys: Vec<String> = state
            .sorted_visible_sections()
            .into_iter()
            .map(|s| s.section_key)
            .collect();
        assert_eq!(keys, vec!["x", "y"]);
    }
}
