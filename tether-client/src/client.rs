//! Client: base descriptor, adaptation hook and dispatch.

use crate::adapter::{NoAuth, RequestAdapter};
use crate::builder::RequestBuilder;
use crate::error::{ApiError, map_status};
use std::sync::Arc;
use tether_core::{FragmentRegistry, Resource};

/// Client for a Tether platform instance.
///
/// Holds the base request descriptor (scheme, host, client-wide headers),
/// the adaptation hook, and the fragment registry used to decode response
/// payloads. Endpoint methods pass a per-call [`RequestBuilder`] to
/// [`send`](Client::send) or [`fetch`](Client::fetch); the client runs it
/// through the adapter, merges it onto the base, and dispatches.
///
/// # Example
///
/// ```no_run
/// use tether_client::{BearerAuth, Client};
///
/// let client = Client::new("iot.example.com")
///     .adapter(BearerAuth::new("token"));
/// ```
pub struct Client {
    http: reqwest::Client,
    base: RequestBuilder,
    adapter: Arc<dyn RequestAdapter>,
    registry: Arc<FragmentRegistry>,
}

impl Client {
    /// Client for `host`, over https, with no credentials and an empty
    /// fragment registry.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: RequestBuilder::new().scheme("https").host(host),
            adapter: Arc::new(NoAuth),
            registry: Arc::new(FragmentRegistry::new()),
        }
    }

    /// Replace the base descriptor entirely.
    #[must_use]
    pub fn base(mut self, base: RequestBuilder) -> Self {
        self.base = base;
        self
    }

    /// Add a client-wide default header to the base descriptor.
    /// Per-call headers win the merge for the same name.
    #[must_use]
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.base = self.base.header(name, value);
        self
    }

    /// Set the adaptation hook.
    #[must_use]
    pub fn adapter(mut self, adapter: impl RequestAdapter + 'static) -> Self {
        self.adapter = Arc::new(adapter);
        self
    }

    /// Share a fragment registry for response decoding.
    #[must_use]
    pub fn registry(mut self, registry: Arc<FragmentRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The registry used to decode responses.
    pub fn fragment_registry(&self) -> &FragmentRegistry {
        &self.registry
    }

    /// Run the per-call descriptor through the adapter, then merge it onto
    /// the base descriptor. This is the effective descriptor [`send`]
    /// dispatches; exposed so callers can inspect what would go out.
    ///
    /// [`send`]: Client::send
    #[must_use]
    pub fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        self.base.merge(self.adapter.adapt(request))
    }

    /// Dispatch a per-call descriptor and return the raw response.
    ///
    /// Non-success statuses are mapped to the [`ApiError`] taxonomy; the
    /// body text is preserved in the error.
    pub async fn send(&self, request: RequestBuilder) -> Result<ApiResponse, ApiError> {
        let request = self.prepare(request).build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::Network)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            return Err(map_status(status, body));
        }
        Ok(ApiResponse { status, body })
    }

    /// Dispatch a per-call descriptor and decode the response payload as
    /// resource `T` through the client's fragment registry.
    pub async fn fetch<T: Resource>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response.decode(&self.registry)
    }
}

/// A successful response: status plus body text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status (always a success code).
    pub status: reqwest::StatusCode,
    /// Raw body text.
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, ApiError> {
        serde_json::from_str(&self.body).map_err(ApiError::InvalidJson)
    }

    /// Decode the body as resource `T`.
    pub fn decode<T: Resource>(&self, registry: &FragmentRegistry) -> Result<T, ApiError> {
        let payload = self.json()?;
        tether_core::decode(registry, &payload).map_err(ApiError::Decode)
    }
}
