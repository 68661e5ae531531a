use crate::database::{ContactSubmission, NewsletterSubscriber, Repository};
use crate::utils::error::ApiError;
use crate::utils::validation::{validate_email, validate_message, validate_name};
use async_trait::async_trait;
use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Port for the form writes, so submission logic can be exercised
/// without a database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn insert_contact_submission(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> anyhow::Result<ContactSubmission>;

    async fn insert_newsletter_subscriber(
        &self,
        email: &str,
    ) -> anyhow::Result<NewsletterSubscriber>;
}

#[async_trait]
impl ContactStore for Repository {
    async fn insert_contact_submission(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> anyhow::Result<ContactSubmission> {
        Repository::insert_contact_submission(self, name, email, message).await
    }

    async fn insert_newsletter_subscriber(
        &self,
        email: &str,
    ) -> anyhow::Result<NewsletterSubscriber> {
        Repository::insert_newsletter_subscriber(self, email).await
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: i32,
    pub success: bool,
}

/// Validation failures block the write and return the offending
/// field; nothing is inserted. Fields are stored trimmed.
async fn submit_contact(
    store: &dyn ContactStore,
    request: &ContactRequest,
) -> Result<SubmissionResponse, ApiError> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_message(&request.message)?;

    let submission = store
        .insert_contact_submission(
            request.name.trim(),
            request.email.trim(),
            request.message.trim(),
        )
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    info!("Contact submission {} from {}", submission.id, submission.email);

    Ok(SubmissionResponse {
        id: submission.id,
        success: true,
    })
}

async fn subscribe_newsletter(
    store: &dyn ContactStore,
    email: &str,
) -> Result<SubmissionResponse, ApiError> {
    validate_email(email)?;

    let subscriber = store
        .insert_newsletter_subscriber(email.trim())
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    info!("Newsletter subscription for {}", subscriber.email);

    Ok(SubmissionResponse {
        id: subscriber.id,
        success: true,
    })
}

/// Contact form submission - POST /api/contact
pub async fn contact_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let response = submit_contact(repository.as_ref(), &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
}

pub async fn newsletter_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Json(request): Json<NewsletterRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let response = subscribe_newsletter(repository.as_ref(), &request.email).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_submission_inserts_exactly_once_with_trimmed_fields() {
        let mut store = MockContactStore::new();
        store
            .expect_insert_contact_submission()
            .withf(|name, email, message| {
                name == "Jan Kowalski"
                    && email == "jan@automatyzator.com"
                    && message == "Please automate our invoicing."
            })
            .times(1)
            .returning(|name, email, message| {
                Ok(ContactSubmission {
                    id: 7,
                    name: name.to_string(),
                    email: email.to_string(),
                    message: message.to_string(),
                    created_at: Utc::now(),
                })
            });

        let response = submit_contact(
            &store,
            &request(
                "  Jan Kowalski ",
                " jan@automatyzator.com ",
                " Please automate our invoicing. ",
            ),
        )
        .await
        .unwrap();

        assert_eq!(response.id, 7);
        assert!(response.success);
    }

    #[tokio::test]
    async fn invalid_submission_performs_no_insert() {
        // No expectations set: any insert call would panic the mock.
        let store = MockContactStore::new();

        let err = submit_contact(&store, &request("J", "jan@automatyzator.com", "long enough msg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "name", .. }));

        let err = submit_contact(&store, &request("Jan", "not-an-email", "long enough msg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "email", .. }));

        let err = submit_contact(&store, &request("Jan", "jan@automatyzator.com", "short"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "message", .. }));
    }

    #[tokio::test]
    async fn failed_insert_surfaces_as_database_error() {
        let mut store = MockContactStore::new();
        store
            .expect_insert_contact_submission()
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("connection reset")));

        let err = submit_contact(
            &store,
            &request("Jan", "jan@automatyzator.com", "Please automate our invoicing."),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn newsletter_rejects_invalid_email_without_insert() {
        let store = MockContactStore::new();
        let err = subscribe_newsletter(&store, "plainaddress").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "email", .. }));
    }
}
