use crate::database::{BlogPost, CaseStudy, Repository, Template, Training};
use crate::localization::LocalizationContext;
use crate::utils::error::ApiError;
use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Cached, language-parameterized read. Cache entries are keyed by
/// resource and language; a language change invalidates them all.
async fn cached_localized_fetch<F, Fut, T>(
    localization: &LocalizationContext,
    resource: &str,
    lang: Option<String>,
    fetch: F,
) -> Result<Json<Value>, ApiError>
where
    F: FnOnce(String) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<T>>,
    T: serde::Serialize,
{
    let language = match lang {
        Some(tag) => localization.resolve(&tag),
        None => localization.current_language(),
    };

    if let Some(cached) = localization.cache().get(resource, &language) {
        debug!("Cache hit: {} [{}]", resource, language);
        return Ok(Json(cached));
    }

    let items = fetch(language.clone())
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let value = serde_json::to_value(items)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    localization.cache().set(resource, &language, value.clone());

    Ok(Json(value))
}

pub async fn list_services_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(localization): Extension<Arc<LocalizationContext>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Value>, ApiError> {
    cached_localized_fetch(&localization, "services", query.lang, move |lang| async move {
        repository.list_services(&lang).await
    })
    .await
}

pub async fn list_why_us_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(localization): Extension<Arc<LocalizationContext>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Value>, ApiError> {
    cached_localized_fetch(&localization, "why-us", query.lang, move |lang| async move {
        repository.list_why_us_items(&lang).await
    })
    .await
}

pub async fn list_blog_posts_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = repository
        .list_blog_posts()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(posts))
}

pub async fn featured_blog_posts_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let posts = repository
        .list_featured_blog_posts()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(posts))
}

pub async fn blog_post_by_slug_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let post = repository
        .find_blog_post_by_slug(&slug)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("Blog post not found: {}", slug)))?;

    Ok(Json(post))
}

pub async fn featured_case_studies_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<CaseStudy>>, ApiError> {
    let studies = repository
        .list_featured_case_studies()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(studies))
}

pub async fn featured_templates_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<Template>>, ApiError> {
    let templates = repository
        .list_featured_templates()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(templates))
}

pub async fn list_trainings_handler(
    Extension(repository): Extension<Arc<Repository>>,
) -> Result<Json<Vec<Training>>, ApiError> {
    let trainings = repository
        .list_trainings()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    Ok(Json(trainings))
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub locale: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub language: String,
}

/// Persist a new language selection. Invalidates every cached
/// language-dependent fetch so subsequent reads re-fetch.
pub async fn set_language_handler(
    Extension(localization): Extension<Arc<LocalizationContext>>,
    Json(request): Json<LanguageRequest>,
) -> Json<LanguageResponse> {
    let language = localization.set_language(&request.locale);
    Json(LanguageResponse { language })
}
