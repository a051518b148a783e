// Remote collections service client.
// JSON over HTTPS under `{base_url}/api/v1`, authenticated with a bearer API key.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::types::collection::{
    AddLinkRequest, Collection, CreateCollectionRequest, Link, TokenCheck, UpdateCollectionRequest,
};
use crate::types::errors::ApiError;

/// Path prefix of every endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations offered by the remote collections service.
#[async_trait]
pub trait CollectionsApi: Send + Sync {
    /// Never fails; transport and HTTP errors come back as an invalid token with a message.
    async fn check_token(&self) -> TokenCheck;
    async fn get_collections(&self) -> Result<Vec<Collection>, ApiError>;
    async fn create_collection(&self, request: &CreateCollectionRequest) -> Result<Collection, ApiError>;
    async fn update_collection(
        &self,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, ApiError>;
    async fn delete_collection(&self, id: &str) -> Result<(), ApiError>;
    async fn add_link(&self, request: &AddLinkRequest) -> Result<Link, ApiError>;
}

/// reqwest implementation of [`CollectionsApi`].
pub struct CollectionsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CollectionsClient {
    /// Fails with [`ApiError::NotConfigured`] when the base URL or the API key is blank.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let api_key = api_key.trim().to_string();
        if base_url.is_empty() || api_key.is_empty() {
            return Err(ApiError::NotConfigured);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
    }

    /// Sends the request and returns the JSON body, `Null` for an empty one.
    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await.map_err(|e| {
            error!("API request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!("API request returned HTTP {}", status.as_u16());
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        self.send(self.request(method, path).json(body)).await
    }
}

/// Decodes `value`, unwrapping `{ "<key>": ... }` when the service wraps its payload.
fn decode_payload<T: DeserializeOwned>(mut value: Value, key: &str) -> Result<T, ApiError> {
    if let Some(inner) = value.as_object_mut().and_then(|map| map.remove(key)) {
        value = inner;
    }
    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl CollectionsApi for CollectionsClient {
    async fn check_token(&self) -> TokenCheck {
        match self.send(self.request(Method::GET, "/tokens/check")).await {
            Ok(_) => TokenCheck {
                valid: true,
                message: None,
            },
            Err(e) => TokenCheck {
                valid: false,
                message: Some(e.to_string()),
            },
        }
    }

    async fn get_collections(&self) -> Result<Vec<Collection>, ApiError> {
        let body = self.send(self.request(Method::GET, "/collections")).await?;
        decode_payload(body, "collections")
    }

    async fn create_collection(&self, request: &CreateCollectionRequest) -> Result<Collection, ApiError> {
        let body = self.send_json(Method::POST, "/collections", request).await?;
        decode_payload(body, "collection")
    }

    async fn update_collection(
        &self,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, ApiError> {
        let path = format!("/collections/{}", id);
        let body = self.send_json(Method::PUT, &path, request).await?;
        decode_payload(body, "collection")
    }

    async fn delete_collection(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/collections/{}", id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn add_link(&self, request: &AddLinkRequest) -> Result<Link, ApiError> {
        let body = self.send_json(Method::POST, "/links", request).await?;
        decode_payload(body, "link")
    }
}
