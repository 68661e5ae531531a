use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-section visibility configuration. `section_key` is the join key
/// between routing, menu rendering, and landing-page composition.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSetting {
    pub id: i32,
    pub section_key: String,
    pub display_name: String,
    pub is_enabled: bool,
    pub show_in_menu: bool,
    pub display_order: i32,
    /// Section-specific configuration, JSON-encoded (e.g. booking URL).
    pub metadata: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub language: String,
    pub is_featured: bool,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i32>,
    pub is_featured: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhyUsItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub language: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub language: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted by the admin settings-update endpoint. Only the
/// provided fields are written; `section_key` itself is immutable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSettingUpdate {
    pub display_name: Option<String>,
    pub is_enabled: Option<bool>,
    pub show_in_menu: Option<bool>,
    pub display_order: Option<i32>,
    pub metadata: Option<String>,
}
