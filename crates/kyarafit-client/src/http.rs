//! `reqwest`-backed implementation of [`PieceApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use kyarafit_core::config::ApiConfig;
use kyarafit_core::error::ErrorKind;
use kyarafit_core::types::{AccessToken, Page, PieceId, QueryCriteria};
use kyarafit_core::{AppError, AppResult};
use kyarafit_entity::{CreatePiece, Piece, UpdatePiece};

use crate::api::{HealthStatus, PieceApi};
use crate::error::{translate_status, translate_transport};
use crate::wire::{CategoriesBody, ListBody, PieceBody};

/// HTTP client for the pieces backend.
#[derive(Debug, Clone)]
pub struct HttpPieceClient {
    client: Client,
    base_url: Url,
}

impl HttpPieceClient {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "API base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build HTTP client: {e}"),
                    e,
                )
            })?;

        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/v1/pieces/{segments...}` with each segment escaped.
    fn pieces_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["api", "v1", "pieces"])
                .extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, token: &AccessToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(token.expose())
    }

    /// Send a request and turn any failure into a logged [`AppError`].
    async fn execute(&self, operation: &'static str, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await.map_err(|e| {
            let err = translate_transport(e);
            error!(operation, error = %err, "Pieces request failed");
            err
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "Pieces request succeeded");
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(operation, error = %e, "Failed to read error body");
                String::new()
            }
        };
        let err = translate_status(status, &body);
        match err.kind {
            ErrorKind::Server => {
                error!(operation, status = status.as_u16(), error = %err, "Backend error")
            }
            _ => warn!(operation, status = status.as_u16(), error = %err, "Request rejected"),
        }
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> AppResult<T> {
        let bytes = response.bytes().await.map_err(|e| {
            let err = translate_transport(e);
            error!(operation, error = %err, "Failed to read response body");
            err
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let err = AppError::from(e);
            error!(operation, error = %err, "Failed to decode response body");
            err
        })
    }
}

#[async_trait]
impl PieceApi for HttpPieceClient {
    async fn list(&self, token: &AccessToken, criteria: &QueryCriteria) -> AppResult<Page<Piece>> {
        let mut url = self.pieces_url(&[]);
        url.query_pairs_mut().extend_pairs(criteria.query_pairs());

        let response = self
            .execute("list", self.request(Method::GET, url, token))
            .await?;
        let body: ListBody = Self::decode("list", response).await?;
        Ok(body.into_page(criteria))
    }

    async fn get(&self, token: &AccessToken, id: &PieceId) -> AppResult<Piece> {
        let url = self.pieces_url(&[id.as_str()]);
        let response = self.execute("get", self.request(Method::GET, url, token)).await?;
        let body: PieceBody = Self::decode("get", response).await?;
        Ok(body.into_piece())
    }

    async fn create(&self, token: &AccessToken, draft: &CreatePiece) -> AppResult<Piece> {
        let url = self.pieces_url(&[]);
        let response = self
            .execute("create", self.request(Method::POST, url, token).json(draft))
            .await?;
        let body: PieceBody = Self::decode("create", response).await?;
        Ok(body.into_piece())
    }

    async fn update(
        &self,
        token: &AccessToken,
        id: &PieceId,
        patch: &UpdatePiece,
    ) -> AppResult<Piece> {
        let url = self.pieces_url(&[id.as_str()]);
        let response = self
            .execute("update", self.request(Method::PUT, url, token).json(patch))
            .await?;
        let body: PieceBody = Self::decode("update", response).await?;
        Ok(body.into_piece())
    }

    async fn delete(&self, token: &AccessToken, id: &PieceId) -> AppResult<()> {
        let url = self.pieces_url(&[id.as_str()]);
        self.execute("delete", self.request(Method::DELETE, url, token))
            .await?;
        Ok(())
    }

    async fn list_categories(&self, token: &AccessToken) -> AppResult<Vec<String>> {
        let url = self.pieces_url(&["categories"]);
        let response = self
            .execute("list_categories", self.request(Method::GET, url, token))
            .await?;
        let body: CategoriesBody = Self::decode("list_categories", response).await?;
        Ok(body.into_unique())
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("health");
        }
        let response = self.execute("health", self.client.get(url)).await?;
        Self::decode("health", response).await
    }
}
