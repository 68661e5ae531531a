use super::models::{
    AdminUser, BlogPost, CaseStudy, ContactSubmission, NewsletterSubscriber, SectionSetting,
    SectionSettingUpdate, ServiceItem, Template, Training, WhyUsItem,
};
use super::DbPool;
use anyhow::Result;
use tracing::debug;

pub struct Repository {
    pub pool: DbPool,
}

impl Repository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Full section-settings collection, in display order.
    pub async fn list_section_settings(&self) -> Result<Vec<SectionSetting>> {
        let settings = sqlx::query_as::<_, SectionSetting>(
            r#"SELECT
                id, section_key, display_name,
                is_enabled, show_in_menu, display_order,
                metadata, updated_at
               FROM section_settings
               ORDER BY display_order ASC, id ASC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Loaded {} section settings", settings.len());

        Ok(settings)
    }

    /// Partial update by id. Returns None when the id does not exist.
    pub async fn update_section_setting(
        &self,
        id: i32,
        update: &SectionSettingUpdate,
    ) -> Result<Option<SectionSetting>> {
        let setting = sqlx::query_as::<_, SectionSetting>(
            r#"UPDATE section_settings SET
                display_name  = COALESCE($2, display_name),
                is_enabled    = COALESCE($3, is_enabled),
                show_in_menu  = COALESCE($4, show_in_menu),
                display_order = COALESCE($5, display_order),
                metadata      = COALESCE($6, metadata),
                updated_at    = NOW()
               WHERE id = $1
               RETURNING
                id, section_key, display_name,
                is_enabled, show_in_menu, display_order,
                metadata, updated_at"#,
        )
        .bind(id)
        .bind(update.display_name.as_deref())
        .bind(update.is_enabled)
        .bind(update.show_in_menu)
        .bind(update.display_order)
        .bind(update.metadata.as_deref())
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(setting)
    }

    pub async fn list_services(&self, language: &str) -> Result<Vec<ServiceItem>> {
        let items = sqlx::query_as::<_, ServiceItem>(
            r#"SELECT id, title, description, icon, language, display_order
               FROM services
               WHERE language = $1
               ORDER BY display_order ASC, id ASC"#,
        )
        .bind(language)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(items)
    }

    pub async fn list_why_us_items(&self, language: &str) -> Result<Vec<WhyUsItem>> {
        let items = sqlx::query_as::<_, WhyUsItem>(
            r#"SELECT id, title, description, icon, language, display_order
               FROM why_us_items
               WHERE language = $1
               ORDER BY display_order ASC, id ASC"#,
        )
        .bind(language)
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(items)
    }

    pub async fn list_blog_posts(&self) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"SELECT
                id, slug, title, excerpt, content,
                image_url, language, is_featured, published_at
               FROM blog_posts
               ORDER BY published_at DESC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(posts)
    }

    pub async fn list_featured_blog_posts(&self) -> Result<Vec<BlogPost>> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"SELECT
                id, slug, title, excerpt, content,
                image_url, language, is_featured, published_at
               FROM blog_posts
               WHERE is_featured = TRUE
               ORDER BY published_at DESC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(posts)
    }

    pub async fn find_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let post = sqlx::query_as::<_, BlogPost>(
            r#"SELECT
                id, slug, title, excerpt, content,
                image_url, language, is_featured, published_at
               FROM blog_posts
               WHERE slug = $1"#,
        )
        .bind(slug)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(post)
    }

    pub async fn list_featured_case_studies(&self) -> Result<Vec<CaseStudy>> {
        let studies = sqlx::query_as::<_, CaseStudy>(
            r#"SELECT id, slug, title, description, image_url, is_featured
               FROM case_studies
               WHERE is_featured = TRUE
               ORDER BY id ASC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(studies)
    }

    pub async fn list_featured_templates(&self) -> Result<Vec<Template>> {
        let templates = sqlx::query_as::<_, Template>(
            r#"SELECT id, slug, title, description, image_url, price_cents, is_featured
               FROM templates
               WHERE is_featured = TRUE
               ORDER BY id ASC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(templates)
    }

    pub async fn list_trainings(&self) -> Result<Vec<Training>> {
        let trainings = sqlx::query_as::<_, Training>(
            r#"SELECT id, slug, title, description, image_url, display_order
               FROM trainings
               ORDER BY display_order ASC, id ASC"#,
        )
        .fetch_all(self.pool.get_pool())
        .await?;

        Ok(trainings)
    }

    pub async fn insert_contact_submission(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactSubmission> {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"INSERT INTO contact_submissions (name, email, message)
               VALUES ($1, $2, $3)
               RETURNING id, name, email, message, created_at"#,
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(submission)
    }

    /// Idempotent subscribe: re-submitting an existing address returns
    /// the existing row instead of failing the unique constraint.
    pub async fn insert_newsletter_subscriber(
        &self,
        email: &str,
    ) -> Result<NewsletterSubscriber> {
        let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
            r#"INSERT INTO newsletter_subscribers (email)
               VALUES ($1)
               ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
               RETURNING id, email, created_at"#,
        )
        .bind(email)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(subscriber)
    }

    /// Create or update the bootstrap admin account.
    pub async fn upsert_admin_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminUser> {
        let admin = sqlx::query_as::<_, AdminUser>(
            r#"INSERT INTO admin_users (username, password_hash)
               VALUES ($1, $2)
               ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
               RETURNING id, username, password_hash, created_at"#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool.get_pool())
        .await?;

        Ok(admin)
    }

    pub async fn find_admin_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        let admin = sqlx::query_as::<_, AdminUser>(
            r#"SELECT id, username, password_hash, created_at
               FROM admin_users
               WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(self.pool.get_pool())
        .await?;

        Ok(admin)
    }
}
