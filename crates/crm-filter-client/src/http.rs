//! HTTP client for the remote CRM query engine and saved filter store.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crm_filter_core::defaults::SAVED_FILTERS_PATH;
use crm_filter_core::logging;
use crm_filter_core::{
    CreateSavedFilterRequest, EntityType, Error, ListQuery, RecordPage, RecordQueryEngine, Result,
    SavedFilter, SavedFilterStore,
};

use crate::config::ClientConfig;

/// Error body returned by the CRM API. Either key may be present.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// The list endpoint answers with a bare array or a `{ "data": [...] }` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SavedFilterList {
    Bare(Vec<SavedFilter>),
    Wrapped { data: Vec<SavedFilter> },
}

impl SavedFilterList {
    fn into_vec(self) -> Vec<SavedFilter> {
        match self {
            Self::Bare(filters) | Self::Wrapped { data: filters } => filters,
        }
    }
}

/// reqwest-backed implementation of [`RecordQueryEngine`] and [`SavedFilterStore`].
pub struct HttpCrmClient {
    client: Client,
    config: ClientConfig,
}

impl HttpCrmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing CRM API client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, self.config.url(endpoint))
            .header("Content-Type", "application/json");

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        req.send()
            .await
            .map_err(|e| Error::Request(format!("Request failed: {}", e)))
    }

    /// Turn a non-success response into an error, reading the body for a message.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .or(body.error)
            .unwrap_or_else(|| if text.is_empty() { status.to_string() } else { text });

        warn!({ logging::STATUS } = status.as_u16(), { logging::ERROR_MSG } = %message, "CRM API returned an error");
        Err(Error::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Failed to parse response: {}", e)))
    }

    fn saved_filter_path(id: &str) -> String {
        format!("{}/{}", SAVED_FILTERS_PATH, id)
    }

    fn not_found_as_missing(err: Error, id: &str) -> Error {
        match err {
            Error::Remote { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                Error::SavedFilterNotFound(id.to_string())
            }
            other => other,
        }
    }
}

#[async_trait]
impl RecordQueryEngine for HttpCrmClient {
    #[instrument(skip(self, query), fields(component = "http_client", op = "list_records", entity_type = %entity))]
    async fn list_records(&self, entity: EntityType, query: &ListQuery) -> Result<RecordPage> {
        let start = Instant::now();
        let endpoint = format!("/{}/query", entity.plural());

        debug!(
            page = query.page,
            limit = query.limit,
            has_filter_group = query.filter_group.is_some(),
            { logging::SAVED_FILTER_ID } = query.saved_filter_id.as_deref().unwrap_or(""),
            "Sending list query"
        );

        let response = self
            .send(self.build_request(Method::POST, &endpoint).json(query))
            .await?;
        let response = Self::check_status(response)
            .await
            .map_err(|e| match e {
                Error::Remote { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                    Error::NotFound(format!("record collection {}", endpoint))
                }
                other => other,
            })?;
        let page: RecordPage = Self::parse(response).await?;

        debug!(
            { logging::RESULT_COUNT } = page.data.len(),
            total = page.total,
            { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
            "List query complete"
        );
        Ok(page)
    }
}

#[async_trait]
impl SavedFilterStore for HttpCrmClient {
    #[instrument(skip(self, req), fields(component = "http_client", op = "save_filter", entity_type = %req.entity_type))]
    async fn save(&self, req: CreateSavedFilterRequest) -> Result<SavedFilter> {
        req.validate()?;

        let response = self
            .send(self.build_request(Method::POST, SAVED_FILTERS_PATH).json(&req))
            .await?;
        let response = Self::check_status(response).await?;
        let saved: SavedFilter = Self::parse(response).await?;

        info!(
            { logging::SAVED_FILTER_ID } = %saved.id,
            { logging::RULE_COUNT } = saved.filter_group.leaf_count(),
            "Saved filter created"
        );
        Ok(saved)
    }

    #[instrument(skip(self), fields(component = "http_client", op = "load_filter", saved_filter_id = %id))]
    async fn load(&self, id: &str) -> Result<SavedFilter> {
        let response = self
            .send(self.build_request(Method::GET, &Self::saved_filter_path(id)))
            .await?;
        let response = Self::check_status(response)
            .await
            .map_err(|e| Self::not_found_as_missing(e, id))?;
        Self::parse(response).await
    }

    #[instrument(skip(self), fields(component = "http_client", op = "list_filters", entity_type = %entity))]
    async fn list(&self, entity: EntityType) -> Result<Vec<SavedFilter>> {
        let response = self
            .send(
                self.build_request(Method::GET, SAVED_FILTERS_PATH)
                    .query(&[("entityType", entity.as_str())]),
            )
            .await?;
        let response = Self::check_status(response).await?;
        let filters = Self::parse::<SavedFilterList>(response).await?.into_vec();

        debug!({ logging::RESULT_COUNT } = filters.len(), "Listed saved filters");
        Ok(filters)
    }

    #[instrument(skip(self), fields(component = "http_client", op = "delete_filter", saved_filter_id = %id))]
    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .send(self.build_request(Method::DELETE, &Self::saved_filter_path(id)))
            .await?;
        Self::check_status(response)
            .await
            .map_err(|e| Self::not_found_as_missing(e, id))?;

        info!("Saved filter deleted");
        Ok(())
    }
}
