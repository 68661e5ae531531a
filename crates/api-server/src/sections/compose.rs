//! Landing-page composition: turn the resolved settings order into the
//! ordered list of renderable section units.

use super::settings::SettingsState;
use serde::Serialize;

/// Closed set of section keys the composition engine can render.
/// Keys outside this set are skipped, not rejected, so settings rows
/// for not-yet-deployed section types never break the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKey {
    Services,
    WhyUs,
    Blog,
    Shop,
    CaseStudies,
    Templates,
}

impl SectionKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "services" => Some(Self::Services),
            "why-us" => Some(Self::WhyUs),
            "blog" => Some(Self::Blog),
            "shop" => Some(Self::Shop),
            "case-studies" => Some(Self::CaseStudies),
            "templates" => Some(Self::Templates),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::WhyUs => "why-us",
            Self::Blog => "blog",
            Self::Shop => "shop",
            Self::CaseStudies => "case-studies",
            Self::Templates => "templates",
        }
    }
}

/// One renderable block of the landing page. Hero, call-to-action and
/// contact are fixed and not settings-gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "section", rename_all = "camelCase")]
pub enum SectionUnit {
    Hero,
    Section(SectionKey),
    CallToAction,
    Contact,
}

/// Ordered unit list for the landing page. While settings are still
/// unresolved only the hero renders; a definitive (even empty)
/// settings list gets the full fixed frame around it.
pub fn compose(settings: &SettingsState) -> Vec<SectionUnit> {
    let mut units = vec![SectionUnit::Hero];

    if !settings.is_loaded() {
        return units;
    }

    units.extend(
        settings
            .sorted_visible_sections()
            .iter()
            .filter_map(|s| SectionKey::from_key(&s.section_key))
            .map(SectionUnit::Section),
    );

    units.push(SectionUnit::CallToAction);
    units.push(SectionUnit::Contact);
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SectionSetting;
    use chrono::Utc;

    fn setting(key: &str, order: i32, enabled: bool) -> SectionSetting {
        SectionSetting {
            id: order,
            section_key: key.to_string(),
            display_name: key.to_string(),
            is_enabled: enabled,
            show_in_menu: true,
            display_order: order,
            metadata: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn loading_renders_hero_only() {
        assert_eq!(compose(&SettingsState::Loading), vec![SectionUnit::Hero]);
        assert_eq!(compose(&SettingsState::Failed), vec![SectionUnit::Hero]);
    }

    #[test]
    fn loaded_list_is_framed_and_ordered() {
        let state = SettingsState::Loaded(vec![
            setting("blog", 2, true),
            setting("services", 0, true),
            setting("shop", 1, false),
            setting("why-us", 1, true),
        ]);
        assert_eq!(
            compose(&state),
            vec![
                SectionUnit::Hero,
                SectionUnit::Section(SectionKey::Services),
                SectionUnit::Section(SectionKey::WhyUs),
                SectionUnit::Section(SectionKey::Blog),
                SectionUnit::CallToAction,
                SectionUnit::Contact,
            ]
        );
    }

    #[test]
    fn unknown_keys_are_skipped_silently() {
        let state = SettingsState::Loaded(vec![
            setting("services", 0, true),
            setting("webinars", 1, true),
        ]);
        assert_eq!(
            compose(&state),
            vec![
                SectionUnit::Hero,
                SectionUnit::Section(SectionKey::Services),
                SectionUnit::CallToAction,
                SectionUnit::Contact,
            ]
        );
    }

    #[test]
    fn empty_settings_keep_the_fixed_frame() {
        let state = SettingsState::Loaded(vec![]);
        assert_eq!(
            compose(&state),
            vec![
                SectionUnit::Hero,
                SectionUnit::CallToAction,
                SectionUnit::Contact,
            ]
        );
    }
}
