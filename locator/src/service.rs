//! Service locator façade: override-or-discover on start, lazy lookup on an empty cache.

use std::sync::Arc;

use env_config::{LocatorSettings, ServerProperties};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::AddressCache;
use crate::endpoint::{EndpointSet, CONFIG_SERVICE_APP_NAME};
use crate::error::{DiscoveryError, HttpError};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::overrides::{OverrideResolver, OverrideSource};
use crate::refresher::PeriodicRefresher;
use crate::remote::RemoteLocator;
use crate::tracer::{Tracer, TracingTracer};

/// Which way the locator resolved its addresses. Fixed for the locator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorMode {
    /// Addresses come from a static override; no remote lookups ever happen.
    Override,
    /// Addresses come from the meta service and are refreshed in the background.
    Dynamic,
}

/// Resolves and caches config service addresses.
///
/// Dropping the locator stops its background refresher.
pub struct ServiceLocator {
    mode: LocatorMode,
    cache: Arc<AddressCache>,
    remote: Arc<RemoteLocator>,
    shutdown: CancellationToken,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceLocator {
    pub fn builder(settings: LocatorSettings) -> ServiceLocatorBuilder {
        ServiceLocatorBuilder::new(settings)
    }

    pub fn mode(&self) -> LocatorMode {
        self.mode
    }

    /// Current cache contents, without any network access. May be empty.
    pub fn cached_endpoints(&self) -> Arc<EndpointSet> {
        self.cache.read()
    }

    /// Config service endpoints.
    ///
    /// Served from the cache when it holds anything. When the cache is empty a full
    /// remote lookup runs on the caller's task and its error is returned as is.
    pub async fn get_endpoints(&self) -> Result<Arc<EndpointSet>, DiscoveryError> {
        let cached = self.cache.read();
        if !cached.is_empty() {
            return Ok(cached);
        }
        self.remote.lookup().await
    }

    /// Stops the background refresher and waits for it to exit.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = self.refresher.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "config service refresher ended abnormally");
            }
        }
    }
}

impl Drop for ServiceLocator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Configures and starts a [`ServiceLocator`].
pub struct ServiceLocatorBuilder {
    settings: LocatorSettings,
    http: Option<Arc<dyn HttpClient>>,
    tracer: Arc<dyn Tracer>,
    sources: Option<Vec<Box<dyn OverrideSource>>>,
    app_name: String,
}

impl ServiceLocatorBuilder {
    fn new(settings: LocatorSettings) -> Self {
        Self {
            settings,
            http: None,
            tracer: Arc::new(TracingTracer),
            sources: None,
            app_name: CONFIG_SERVICE_APP_NAME.to_string(),
        }
    }

    /// HTTP client for meta service lookups. Defaults to [`ReqwestHttpClient`].
    pub fn http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Trace sink. Defaults to [`TracingTracer`].
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Override sources in priority order. Defaults to
    /// [`OverrideResolver::default_sources`] over the host's `server.properties`.
    pub fn override_sources(mut self, sources: Vec<Box<dyn OverrideSource>>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// App name stamped on override endpoints.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Resolves overrides and, if none apply, runs one best-effort remote lookup and
    /// starts the periodic refresher. Must be called inside a Tokio runtime.
    ///
    /// Fails only if the default HTTP client cannot be built.
    pub async fn start(self) -> Result<ServiceLocator, HttpError> {
        let sources = match self.sources {
            Some(sources) => sources,
            None => {
                let props = ServerProperties::load(&self.settings.server_properties_path)
                    .unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "ignoring unreadable server properties");
                        ServerProperties::empty()
                    });
                OverrideResolver::default_sources(Arc::new(props))
            }
        };
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new()?),
        };

        let shutdown = CancellationToken::new();
        let cache = Arc::new(AddressCache::new());
        let remote = Arc::new(
            RemoteLocator::new(&self.settings, http, cache.clone(), self.tracer.clone())
                .with_interrupt(shutdown.clone()),
        );

        let overridden = OverrideResolver::new(sources)
            .with_app_name(self.app_name)
            .resolve()
            .and_then(|endpoints| cache.replace(endpoints));

        let (mode, refresher) = if overridden.is_some() {
            (LocatorMode::Override, None)
        } else {
            remote.try_lookup().await;
            let handle = PeriodicRefresher::new(
                remote.clone(),
                self.tracer.clone(),
                self.settings.refresh_interval,
            )
            .spawn(shutdown.clone());
            (LocatorMode::Dynamic, Some(handle))
        };
        tracing::debug!(?mode, "config service locator started");

        Ok(ServiceLocator {
            mode,
            cache,
            remote,
            shutdown,
            refresher: Mutex::new(refresher),
        })
    }
}
