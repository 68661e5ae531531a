use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

mod auth;
mod config;
mod database;
mod handlers;
mod localization;
mod sections;
mod utils;

use auth::JwtManager;
use config::Settings;
use database::{DbPool, Repository};
use localization::LocalizationContext;
use sections::SectionSettingsResolver;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,automatyzator_api=debug".to_string()),
        )
        .with_target(true)
        .json()
        .init();

    info!("Starting Automatyzator API server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded");

    // Initialize database pool
    let db_pool = DbPool::new(&settings.database).await?;
    info!("Database connection established");

    let repository = Arc::new(Repository::new(db_pool));

    // Bootstrap admin account, when configured
    if let (Some(username), Some(password)) = (
        settings.auth.bootstrap_username.as_deref(),
        settings.auth.bootstrap_password.as_deref(),
    ) {
        let hash = auth::password::hash_password(password)?;
        repository.upsert_admin_user(username, &hash).await?;
        info!("Bootstrap admin account ensured: {}", username);
    }

    // Section settings are loaded once at startup and refreshed on
    // every admin mutation. A failed initial fetch is not fatal:
    // visibility checks fail open until a refresh succeeds.
    let resolver = Arc::new(SectionSettingsResolver::new(repository.clone()));
    resolver.refresh().await;

    let localization = Arc::new(LocalizationContext::new(
        settings.localization.default_language.clone(),
        settings.localization.supported_languages.clone(),
    ));

    let jwt = Arc::new(JwtManager::new(
        &settings.auth.jwt_secret,
        settings.auth.token_expiry_seconds,
    ));

    let app = build_router(repository, resolver, localization, jwt);

    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(
    repository: Arc<Repository>,
    resolver: Arc<SectionSettingsResolver>,
    localization: Arc<LocalizationContext>,
    jwt: Arc<JwtManager>,
) -> Router {
    // Health routes (no extensions required beyond the repository)
    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    // Public content API
    let public_routes = Router::new()
        .route(
            "/api/section-settings",
            get(handlers::sections::list_section_settings_handler),
        )
        .route(
            "/api/sections/landing",
            get(handlers::sections::landing_sections_handler),
        )
        .route("/api/sections/guard", get(handlers::sections::guard_handler))
        .route("/api/sections/menu", get(handlers::sections::menu_sections_handler))
        .route("/api/services", get(handlers::content::list_services_handler))
        .route("/api/why-us", get(handlers::content::list_why_us_handler))
        .route("/api/blog-posts", get(handlers::content::list_blog_posts_handler))
        .route(
            "/api/blog-posts/featured",
            get(handlers::content::featured_blog_posts_handler),
        )
        .route(
            "/api/blog-posts/{slug}",
            get(handlers::content::blog_post_by_slug_handler),
        )
        .route(
            "/api/case-studies/featured",
            get(handlers::content::featured_case_studies_handler),
        )
        .route(
            "/api/templates/featured",
            get(handlers::content::featured_templates_handler),
        )
        .route("/api/trainings", get(handlers::content::list_trainings_handler))
        .route("/api/language", post(handlers::content::set_language_handler))
        .route("/api/contact", post(handlers::forms::contact_handler))
        .route("/api/newsletter", post(handlers::forms::newsletter_handler))
        .route("/api/admin/login", post(handlers::admin::login_handler));

    // Admin mutations behind the bearer-token guard
    let admin_routes = Router::new()
        .route(
            "/api/section-settings/{id}",
            put(handlers::sections::update_section_setting_handler),
        )
        .layer(middleware::from_fn(auth::middleware::admin_auth_middleware));

    Router::new()
        .merge(health_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .layer(Extension(repository))
        .layer(Extension(resolver))
        .layer(Extension(localization))
        .layer(Extension(jwt))
        .layer(
            CorsLayer::permissive()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
}
