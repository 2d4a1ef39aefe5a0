//! Endpoint surfaces: thin per-call descriptor assembly over a [`Client`].

use crate::asset::Asset;
use crate::measurement::Measurement;
use serde::Deserialize;
use tether_client::{ApiError, Client, Method, ParamStyle, RequestBuilder};
use tether_core::{FragmentRegistry, Resource};

/// Paging counters returned with list responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStatistics {
    /// Requested page size.
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Page returned.
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Total pages available.
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// Decode a paged envelope: an array of resources under `key`, plus
/// optional `statistics`.
fn decode_page<T: Resource>(
    payload: &serde_json::Value,
    key: &str,
    registry: &FragmentRegistry,
) -> Result<(Vec<T>, Option<PageStatistics>), ApiError> {
    let mut items = Vec::new();
    if let Some(raw_items) = payload.get(key).and_then(serde_json::Value::as_array) {
        for raw in raw_items {
            items.push(tether_core::decode(registry, raw)?);
        }
    }
    let statistics = payload
        .get("statistics")
        .and_then(|raw| serde_json::from_value(raw.clone()).ok());
    Ok((items, statistics))
}

// ─── Inventory ───────────────────────────────────────────────────────────────

/// Filter for asset listings.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    /// Restrict to these asset ids (exploded: `ids=1&ids=2`).
    pub ids: Vec<String>,
    /// Restrict to one asset kind.
    pub kind: Option<String>,
    /// Page size.
    pub page_size: Option<u32>,
    /// Page to fetch.
    pub current_page: Option<u32>,
}

impl AssetFilter {
    /// Append this filter's query parameters to a descriptor.
    #[must_use]
    pub fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        request = request.query_list("ids", &self.ids, ParamStyle::Exploded);
        if let Some(kind) = &self.kind {
            request = request.query("type", kind);
        }
        if let Some(page_size) = self.page_size {
            request = request.query("pageSize", page_size);
        }
        if let Some(current_page) = self.current_page {
            request = request.query("currentPage", current_page);
        }
        request
    }
}

/// One page of assets.
#[derive(Debug, Clone, Default)]
pub struct AssetPage {
    /// Assets on this page.
    pub assets: Vec<Asset>,
    /// Paging counters, when the platform sends them.
    pub statistics: Option<PageStatistics>,
}

/// The inventory endpoint surface.
pub struct Inventory<'a> {
    client: &'a Client,
}

impl<'a> Inventory<'a> {
    /// Inventory calls over `client`.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch one asset by id.
    pub async fn get(&self, id: &str) -> Result<Asset, ApiError> {
        let request = RequestBuilder::new()
            .method(Method::GET)
            .path(format!("/inventory/assets/{id}"))
            .header("accept", "application/json");
        self.client.fetch(request).await
    }

    /// List assets matching `filter`.
    pub async fn list(&self, filter: &AssetFilter) -> Result<AssetPage, ApiError> {
        let request = filter.apply(
            RequestBuilder::new()
                .method(Method::GET)
                .path("/inventory/assets")
                .header("accept", "application/json"),
        );
        let response = self.client.send(request).await?;
        let payload = response.json()?;
        let (assets, statistics) =
            decode_page(&payload, "assets", self.client.fragment_registry())?;
        Ok(AssetPage { assets, statistics })
    }

    /// Create an asset; the platform returns it with id and timestamps.
    pub async fn create(&self, asset: &Asset) -> Result<Asset, ApiError> {
        let payload = tether_core::encode(self.client.fragment_registry(), asset);
        let request = RequestBuilder::new()
            .method(Method::POST)
            .path("/inventory/assets")
            .header("accept", "application/json")
            .json(&payload)?;
        self.client.fetch(request).await
    }

    /// Update an asset in place; returns the updated record.
    pub async fn update(&self, id: &str, asset: &Asset) -> Result<Asset, ApiError> {
        let payload = tether_core::encode(self.client.fragment_registry(), asset);
        let request = RequestBuilder::new()
            .method(Method::PUT)
            .path(format!("/inventory/assets/{id}"))
            .header("accept", "application/json")
            .json(&payload)?;
        self.client.fetch(request).await
    }

    /// Delete an asset.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let request = RequestBuilder::new()
            .method(Method::DELETE)
            .path(format!("/inventory/assets/{id}"));
        self.client.send(request).await.map(|_| ())
    }
}

// ─── Measurements ────────────────────────────────────────────────────────────

/// Filter for measurement listings.
#[derive(Debug, Clone, Default)]
pub struct MeasurementFilter {
    /// Restrict to measurements of one source asset.
    pub source: Option<String>,
    /// Inclusive start of the time range, ISO-8601.
    pub date_from: Option<String>,
    /// Exclusive end of the time range, ISO-8601.
    pub date_to: Option<String>,
    /// Restrict to these reading fragments (joined: `a,b,c`).
    pub value_fragment_types: Vec<String>,
    /// Page size.
    pub page_size: Option<u32>,
}

impl MeasurementFilter {
    /// Append this filter's query parameters to a descriptor.
    #[must_use]
    pub fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(source) = &self.source {
            request = request.query("source", source);
        }
        if let Some(date_from) = &self.date_from {
            request = request.query("dateFrom", date_from);
        }
        if let Some(date_to) = &self.date_to {
            request = request.query("dateTo", date_to);
        }
        request = request.query_list(
            "valueFragmentTypes",
            &self.value_fragment_types,
            ParamStyle::CommaJoined,
        );
        if let Some(page_size) = self.page_size {
            request = request.query("pageSize", page_size);
        }
        request
    }
}

/// One page of measurements.
#[derive(Debug, Clone, Default)]
pub struct MeasurementPage {
    /// Measurements on this page.
    pub measurements: Vec<Measurement>,
    /// Paging counters, when the platform sends them.
    pub statistics: Option<PageStatistics>,
}

/// The measurement endpoint surface.
pub struct Measurements<'a> {
    client: &'a Client,
}

impl<'a> Measurements<'a> {
    /// Measurement calls over `client`.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Record one measurement.
    pub async fn create(&self, measurement: &Measurement) -> Result<Measurement, ApiError> {
        let payload = tether_core::encode(self.client.fragment_registry(), measurement);
        let request = RequestBuilder::new()
            .method(Method::POST)
            .path("/measurement/measurements")
            .header("accept", "application/json")
            .json(&payload)?;
        self.client.fetch(request).await
    }

    /// List measurements matching `filter`.
    pub async fn list(&self, filter: &MeasurementFilter) -> Result<MeasurementPage, ApiError> {
        let request = filter.apply(
            RequestBuilder::new()
                .method(Method::GET)
                .path("/measurement/measurements")
                .header("accept", "application/json"),
        );
        let response = self.client.send(request).await?;
        let payload = response.json()?;
        let (measurements, statistics) =
            decode_page(&payload, "measurements", self.client.fragment_registry())?;
        Ok(MeasurementPage {
            measurements,
            statistics,
        })
    }
}
