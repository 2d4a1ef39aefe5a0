//! Request descriptors: accumulate the pieces of one outgoing call.

use crate::error::BuildError;
use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use url::Url;

/// How a sequence-valued query parameter is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// One `key=value` pair per element: `ids=1&ids=2&ids=3`.
    Exploded,
    /// A single pair with elements comma-joined: `ids=1,2,3`.
    CommaJoined,
}

/// Accumulator for one outgoing request.
///
/// A per-call descriptor may leave scheme, host — even path — unset; the
/// client completes it by merging onto its base descriptor (see
/// [`RequestBuilder::merge`]). All setters are chainable and consume
/// `self`.
///
/// Not intended for concurrent mutation; build per call.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    scheme: Option<String>,
    host: Option<String>,
    path: String,
    query: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// An empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method. Last write wins.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the URL scheme (`http`/`https`). Last write wins.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Set the host (optionally `host:port`). Last write wins.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the request path. Last write wins.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a header. `None` and empty values are ignored; otherwise the
    /// last value for a given name wins. Names are matched
    /// case-insensitively.
    #[must_use]
    pub fn header<'a>(mut self, name: &str, value: impl Into<Option<&'a str>>) -> Self {
        if let Some(value) = value.into().filter(|v| !v.is_empty()) {
            self.headers
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
        self
    }

    /// Append one query parameter. Keys may repeat.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a sequence-valued query parameter in the given style.
    /// An empty sequence appends nothing.
    #[must_use]
    pub fn query_list<I>(mut self, key: &str, values: I, style: ParamStyle) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        match style {
            ParamStyle::Exploded => {
                for value in values {
                    self.query.push((key.to_string(), value.to_string()));
                }
            }
            ParamStyle::CommaJoined => {
                let joined = values
                    .into_iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                if !joined.is_empty() {
                    self.query.push((key.to_string(), joined));
                }
            }
        }
        self
    }

    /// Set the body bytes. Last write wins.
    #[must_use]
    pub fn body(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.body = Some(bytes.into());
        self
    }

    /// Serialize `value` as the JSON body and set the content type.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, BuildError> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".into(), "application/json".into());
        Ok(self)
    }

    /// Merge a per-call descriptor onto this base descriptor.
    ///
    /// - scheme, host: the incoming side wins when set, else the base's.
    /// - path: the incoming side wins when non-empty.
    /// - headers: the incoming side wins per name; others are kept.
    /// - query: both sides survive, base's pairs first. No deduplication.
    /// - method, body: the base wins once set. A client-wide default is
    ///   never clobbered by a per-call value; only an unset base adopts
    ///   the incoming one.
    #[must_use]
    pub fn merge(&self, incoming: RequestBuilder) -> RequestBuilder {
        let mut merged = self.clone();
        if incoming.scheme.is_some() {
            merged.scheme = incoming.scheme;
        }
        if incoming.host.is_some() {
            merged.host = incoming.host;
        }
        if !incoming.path.is_empty() {
            merged.path = incoming.path;
        }
        merged.headers.extend(incoming.headers);
        merged.query.extend(incoming.query);
        if merged.method.is_none() {
            merged.method = incoming.method;
        }
        if merged.body.is_none() {
            merged.body = incoming.body;
        }
        merged
    }

    /// Assemble the full URL from scheme, host, path and query.
    pub fn url(&self) -> Result<Url, BuildError> {
        let scheme = self.scheme.as_deref().ok_or(BuildError::MissingScheme)?;
        let host = self.host.as_deref().ok_or(BuildError::MissingHost)?;
        let mut url = Url::parse(&format!("{scheme}://{host}"))?;
        if !self.path.is_empty() {
            url.set_path(&self.path);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// Materialize the descriptor into a transport request.
    ///
    /// The method defaults to `GET` when unset. Fails when the descriptor
    /// cannot form a valid URL or a header name/value is not legal HTTP.
    pub fn build(self) -> Result<reqwest::Request, BuildError> {
        let url = self.url()?;
        let method = self.method.unwrap_or(Method::GET);
        let mut request = reqwest::Request::new(method, url);
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| BuildError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| BuildError::InvalidHeader { name: name.clone() })?;
            request.headers_mut().insert(header_name, header_value);
        }
        if let Some(bytes) = self.body {
            *request.body_mut() = Some(bytes.into());
        }
        Ok(request)
    }
}
