//! Builder for configuring data source instances

use std::sync::Arc;
use std::time::Duration;

use super::DataSource;
use crate::Result;
use crate::cache::DocumentCache;
use crate::config::{ServerMode, SourceConfig};
use crate::transport::{HttpTransport, RetryConfig, RetryingTransport, Transport};

/// Builder for [`DataSource`].
///
/// Starts from [`SourceConfig::default`]; individual setters override it.
///
/// ```rust,no_run
/// use huginn::{DataSource, ServerMode};
///
/// # fn main() -> huginn::Result<()> {
/// let source = DataSource::builder()
///     .server_mode(ServerMode::Live)
///     .cache_capacity(32)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DataSourceBuilder {
    config: SourceConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl DataSourceBuilder {
    pub fn new() -> Self {
        Self {
            config: SourceConfig::default(),
            transport: None,
        }
    }

    /// Replace every setting with `config`.
    pub fn config(mut self, config: SourceConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom transport instead of the reqwest-backed default.
    ///
    /// The timeout setting only applies to the default transport. The
    /// retry policy wraps a custom transport too.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn server_mode(mut self, mode: ServerMode) -> Self {
        self.config.server_mode = mode;
        self
    }

    /// Verbose protocol logging. Forced on for non-live server modes.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Per-request timeout for the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn assignment_server_url(mut self, url: impl Into<String>) -> Self {
        self.config.assignment_server_url = url.into();
        self
    }

    /// Build the data source.
    ///
    /// Fails with [`HuginnError::Configuration`](crate::HuginnError::Configuration)
    /// if the settings are invalid or the HTTP client cannot be created.
    pub fn build(self) -> Result<DataSource> {
        let config = self.config;
        config.validate()?;

        let mut transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                Duration::from_secs(config.timeout_secs),
                &config.user_agent,
            )?),
        };
        if config.retry.is_enabled() {
            transport = Arc::new(RetryingTransport::new(transport, config.retry.clone()));
        }

        let debug_on = config.debug_enabled();
        tracing::debug!(
            mode = %config.server_mode,
            capacity = config.cache_capacity,
            debug = debug_on,
            retry = config.retry.is_enabled(),
            "data source ready"
        );

        Ok(DataSource {
            transport,
            cache: DocumentCache::new(config.cache_capacity),
            server_mode: config.server_mode,
            debug: debug_on,
            user_agent: config.user_agent,
            assignment_server_url: config.assignment_server_url,
        })
    }
}

impl Default for DataSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
