use crate::database::{Repository, SectionSetting, SectionSettingUpdate};
use crate::sections::{compose, guard, SectionSettingsResolver, SectionUnit};
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub async fn list_section_settings_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<SectionSetting>>, ApiError> {
    let settings = repository
        .list_section_settings()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(settings))
}

/// Admin-only partial update. A successful write refreshes the shared
/// resolver so the guard and the composed landing page see the change
/// immediately.
pub async fn update_section_setting_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(resolver): Extension<Arc<SectionSettingsResolver>>,
    Path(id): Path<i32>,
    Json(update): Json<SectionSettingUpdate>,
) -> Result<Json<SectionSetting>, ApiError> {
    let setting = repository
        .update_section_setting(id, &update)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Section setting {} not found", id)))?;

    info!(
        "Section setting updated: {} (enabled={})",
        setting.section_key, setting.is_enabled
    );

    resolver.refresh().await;

    Ok(Json(setting))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingResponse {
    pub units: Vec<SectionUnit>,
    pub settings_loaded: bool,
}

/// Ordered renderable unit list for the landing page.
pub async fn landing_sections_handler(
    Extension(resolver): Extension<Arc<SectionSettingsResolver>>,
) -> Json<LandingResponse> {
    let state = resolver.ensure_loaded().await;
    Json(LandingResponse {
        units: compose(&state),
        settings_loaded: state.is_loaded(),
    })
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardResponse {
    pub allow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Visibility check for a navigated path. Disabled sections redirect
/// to the root path; everything else renders.
pub async fn guard_handler(
    Extension(resolver): Extension<Arc<SectionSettingsResolver>>,
    Query(query): Query<GuardQuery>,
) -> Json<GuardResponse> {
    let state = resolver.ensure_loaded().await;
    match guard::check(&query.path, &state) {
        guard::GuardDecision::Allow => Json(GuardResponse {
            allow: true,
            redirect_to: None,
        }),
        guard::GuardDecision::RedirectHome => Json(GuardResponse {
            allow: false,
            redirect_to: Some("/".to_string()),
        }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub section_key: String,
    pub display_name: String,
}

/// Navigation-menu entries: enabled sections, in display order, with
/// the menu flag honored. Derived from a single settings snapshot so
/// a concurrent refresh cannot mix two generations.
fn menu_entries(state: &crate::sections::SettingsState) -> Vec<MenuEntry> {
    state
        .sorted_visible_sections()
        .into_iter()
        .filter(|s| state.is_visible_in_menu(&s.section_key))
        .map(|s| MenuEntry {
            section_key: s.section_key,
            display_name: s.display_name,
        })
        .collect()
}

pub async fn menu_sections_handler(
    Extension(resolver): Extension<Arc<SectionSettingsResolver>>,
) -> Json<Vec<MenuEntry>> {
    let state = resolver.ensure_loaded().await;
    Json(menu_entries(&state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SectionSetting;
    use crate::sections::SettingsState;
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
    fn menu_honors_order_and_both_flags() {
        let state = SettingsState::Loaded(vec![
            setting("blog", 2, true, true),
            setting("services", 0, true, false),
            setting("shop", 1, false, true),
            setting("why-us", 1, true, true),
        ]);
        let keys: Vec<String> = menu_entries(&state)
            .into_iter()
            .map(|e| e.section_key)
            .collect();
        assert_eq!(keys, vec!["why-us", "blog"]);
    }

    #[test]
    fn menu_is_empty_while_settings_unknown() {
        assert!(menu_entries(&SettingsState::Loading).is_empty());
        assert!(menu_entries(&SettingsState::Failed).is_empty());
    }
}
