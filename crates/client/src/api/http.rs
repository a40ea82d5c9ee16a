//! REST implementation of [`CatalogApi`] over `reqwest`.

use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;

use gearstock_core::{Product, ProductDraft, ProductId};

use crate::config::ClientConfig;

use super::{ApiError, CatalogApi, Confirmation, classify_status};

/// Client for the remote product service.
///
/// Cheap to clone; holds no mutable state. One logical HTTP call per
/// operation, no retries.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    products_url: String,
}

impl HttpCatalogClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            products_url: config.endpoint("products"),
        })
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!("{}/{id}", self.products_url)
    }

    /// Parse a response, classifying non-2xx statuses into the taxonomy.
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Parse the delete acknowledgement, tolerating an empty body.
    async fn parse_confirmation(response: Response) -> Result<Confirmation, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &body));
        }

        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(Confirmation::default());
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl CatalogApi for HttpCatalogClient {
    #[instrument(skip(self, credential))]
    async fn list_all(&self, credential: &SecretString) -> Result<Vec<Product>, ApiError> {
        let response = self
            .client
            .get(&self.products_url)
            .bearer_auth(credential.expose_secret())
            .send()
            .await?;

        Self::parse(response).await
    }

    #[instrument(skip(self, credential, draft), fields(name = %draft.name))]
    async fn create(
        &self,
        credential: &SecretString,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let response = self
            .client
            .post(&self.products_url)
            .bearer_auth(credential.expose_secret())
            .json(draft)
            .send()
            .await?;

        Self::parse(response).await
    }

    #[instrument(skip(self, credential, draft), fields(id = %id))]
    async fn update(
        &self,
        credential: &SecretString,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        let response = self
            .client
            .put(self.product_url(id))
            .bearer_auth(credential.expose_secret())
            .json(draft)
            .send()
            .await?;

        Self::parse(response).await
    }

    #[instrument(skip(self, credential), fields(id = %id))]
    async fn delete(
        &self,
        credential: &SecretString,
        id: &ProductId,
    ) -> Result<Confirmation, ApiError> {
        let response = self
            .client
            .delete(self.product_url(id))
            .bearer_auth(credential.expose_secret())
            .send()
            .await?;

        Self::parse_confirmation(response).await
    }
}
