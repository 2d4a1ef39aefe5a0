//! Request adaptation: inject cross-cutting values before the base merge.

use crate::builder::RequestBuilder;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Hook invoked on every per-call descriptor before it is merged onto the
/// client's base descriptor.
///
/// The default is the identity: the descriptor flows into the same base
/// merge unchanged. Implementations exist purely to inject cross-cutting
/// values — credentials, alternate hosts, tracing headers — without
/// touching per-endpoint code.
pub trait RequestAdapter: Send + Sync {
    /// Transform the per-call descriptor.
    fn adapt(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Identity adapter: requests reach the base merge untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl RequestAdapter for NoAuth {}

/// Injects an `Authorization: Bearer …` header.
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    /// Adapter for the given bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl RequestAdapter for BearerAuth {
    fn adapt(&self, request: RequestBuilder) -> RequestBuilder {
        let value = format!("Bearer {}", self.token);
        request.header("authorization", value.as_str())
    }
}

/// Injects an `Authorization: Basic …` header.
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Adapter for the given credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl RequestAdapter for BasicAuth {
    fn adapt(&self, request: RequestBuilder) -> RequestBuilder {
        let credentials = BASE64.encode(format!("{}:{}", self.username, self.password));
        let value = format!("Basic {credentials}");
        request.header("authorization", value.as_str())
    }
}

/// Pins every request to a fixed scheme and host, regardless of the
/// client's base descriptor (the per-call side wins the merge).
#[derive(Debug, Clone)]
pub struct StaticHost {
    scheme: String,
    host: String,
}

impl StaticHost {
    /// Pin requests to `host` over https.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: "https".into(),
            host: host.into(),
        }
    }

    /// Override the scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }
}

impl RequestAdapter for StaticHost {
    fn adapt(&self, request: RequestBuilder) -> RequestBuilder {
        request.scheme(self.scheme.as_str()).host(self.host.as_str())
    }
}
