//! Hash-validated dataset retrieval.
//!
//! [`DataSource`] owns one [`DocumentCache`] and one [`Transport`]. For a
//! [`DatasetRequest`] it asks the server for the dataset's hash token,
//! serves the payload from the cache when the token is known, and
//! otherwise fetches the payload and stores it under the token (re-asking
//! for the token if the server only computes it on first access).
//!
//! Range queries against services with an undocumented size limit are
//! split per unit and cached under composite keys, see
//! [`DataSource::wikidata_actor_movie`].
//!
//! Only network and malformed-response errors reach callers. Cache
//! failures are logged and treated as a miss (on read) or a skipped store
//! (on write).

mod assignment;
mod builder;
pub mod request;
mod wikidata;

use std::sync::Arc;

use tracing::warn;

use crate::Result;
use crate::cache::{CacheError, DocumentCache};
use crate::config::ServerMode;
use crate::decode::{Decoder, RawText};
use crate::telemetry;
use crate::transport::Transport;

pub use assignment::assignment_url;
pub use builder::DataSourceBuilder;
pub use request::{BoundingBox, DatasetKind, DatasetRequest};
pub use wikidata::{actor_movie_query, composite_key, sparql_url};

/// Value a hash endpoint returns when it has no token yet.
pub const UNAVAILABLE_SENTINEL: &str = "false";

const ACCEPT_JSON: &str = "Accept: application/json";

/// Protocol step logging: `info` when debug output is on, `debug` otherwise.
macro_rules! step {
    ($source:expr, $($arg:tt)+) => {
        if $source.debug {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}
pub(crate) use step;

/// Cache-validation token for a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashToken {
    Known(String),
    /// The server has no token for this data (yet).
    Unavailable,
}

impl HashToken {
    /// Interpret a hash endpoint response body.
    ///
    /// `"false"` and blank bodies mean unavailable; anything else is the
    /// token, trimmed.
    pub fn from_response(body: &str) -> Self {
        let token = body.trim();
        if token.is_empty() || token == UNAVAILABLE_SENTINEL {
            HashToken::Unavailable
        } else {
            HashToken::Known(token.to_string())
        }
    }

    pub fn as_known(&self) -> Option<&str> {
        match self {
            HashToken::Known(token) => Some(token),
            HashToken::Unavailable => None,
        }
    }
}

/// Fetches remote datasets through a shared LRU document cache.
pub struct DataSource {
    transport: Arc<dyn Transport>,
    cache: DocumentCache,
    server_mode: ServerMode,
    debug: bool,
    user_agent: String,
    assignment_server_url: String,
}

impl DataSource {
    /// Create a new builder.
    pub fn builder() -> DataSourceBuilder {
        DataSourceBuilder::new()
    }

    pub fn server_mode(&self) -> ServerMode {
        self.server_mode
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn assignment_server_url(&self) -> &str {
        &self.assignment_server_url
    }

    /// The document cache owned by this source.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Ask for the hash token of `request`.
    ///
    /// Kinds without a hash endpoint use the hash URL itself as the token.
    /// A failing hash endpoint is treated as "no token": the fetch still
    /// goes ahead, just uncached.
    pub async fn hash_token(&self, request: &DatasetRequest) -> HashToken {
        if !request.kind.uses_remote_hash() {
            return HashToken::Known(request.hash_url.clone());
        }

        step!(self, url = %request.hash_url, kind = %request.kind, "requesting hash token");
        match self
            .transport
            .request(&request.hash_url, &[ACCEPT_JSON.to_string()])
            .await
        {
            Ok(body) => HashToken::from_response(&body),
            Err(e) => {
                warn!(url = %request.hash_url, error = %e, "hash endpoint failed, fetching uncached");
                HashToken::Unavailable
            }
        }
    }

    /// Return the raw payload of `request`, from cache when possible.
    ///
    /// At most one data request is made per stable hash token for the
    /// lifetime of the cache.
    pub async fn fetch_dataset(&self, request: &DatasetRequest) -> Result<String> {
        self.fetch_decoded(request, &RawText).await
    }

    /// Hash-validated fetch followed by `decoder`.
    ///
    /// A payload is only stored once it decodes, so a malformed response
    /// fails this call without entering the cache.
    pub async fn fetch_decoded<D: Decoder>(
        &self,
        request: &DatasetRequest,
        decoder: &D,
    ) -> Result<D::Output> {
        let kind = request.kind.as_str();
        let token = self.hash_token(request).await;

        if let Some(key) = token.as_known() {
            step!(self, kind, token = key, "checking cache");
            if let Some(document) = self.cached(key, kind) {
                return decoder.decode(&document);
            }
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "kind" => kind).increment(1);

        step!(self, url = %request.data_url, kind, "requesting data");
        let body = self
            .transport
            .request(&request.data_url, &[ACCEPT_JSON.to_string()])
            .await?;
        let output = decoder.decode(&body)?;

        let token = match token {
            HashToken::Unavailable => self.hash_token(request).await,
            known => known,
        };
        match token {
            HashToken::Known(key) => self.store(&key, body),
            HashToken::Unavailable => {
                step!(self, url = %request.hash_url, kind, "hash token still unavailable, not caching");
            }
        }
        Ok(output)
    }

    /// Fetch `url` cached under a caller-chosen `key`.
    ///
    /// Used where the remote service has no hash endpoint and the key is
    /// derived locally from the query.
    pub async fn fetch_keyed<D: Decoder>(
        &self,
        key: &str,
        url: &str,
        headers: &[String],
        decoder: &D,
    ) -> Result<D::Output> {
        let kind = decoder.name();
        if let Some(document) = self.cached(key, kind) {
            step!(self, key, "served from cache");
            return decoder.decode(&document);
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "kind" => kind).increment(1);

        step!(self, url, key, "requesting data");
        let body = self.transport.request(url, headers).await?;
        let output = decoder.decode(&body)?;
        self.store(key, body);
        Ok(output)
    }

    /// Fetch `url` without touching the cache.
    pub async fn fetch_uncached(&self, url: &str, headers: &[String]) -> Result<String> {
        step!(self, url, "requesting uncached");
        self.transport.request(url, headers).await
    }

    fn cached(&self, key: &str, kind: &'static str) -> Option<String> {
        match self.cache.get(key) {
            Ok(document) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "kind" => kind).increment(1);
                step!(self, key, bytes = document.len(), "cache hit");
                Some(document)
            }
            Err(CacheError::NotFound(_)) => None,
            Err(e) => {
                cache_failure("read", key, &e);
                None
            }
        }
    }

    fn store(&self, key: &str, document: String) {
        let bytes = document.len();
        match self.cache.put(key, document) {
            Ok(evicted) => {
                step!(self, key, bytes, evicted = ?evicted, "stored in cache");
            }
            Err(e) => cache_failure("write", key, &e),
        }
    }
}

fn cache_failure(operation: &'static str, key: &str, error: &CacheError) {
    metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
    warn!(key, error = %error, operation, "cache unavailable, continuing without it");
}
