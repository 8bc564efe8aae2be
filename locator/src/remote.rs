//! Remote locator: bounded-retry lookup of config service addresses from the meta service.

use std::sync::Arc;
use std::time::Duration;

use env_config::{retry_delay, LocatorSettings};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::cache::AddressCache;
use crate::endpoint::{EndpointSet, ServiceEndpoint};
use crate::error::{AttemptError, DiscoveryError};
use crate::http::HttpClient;
use crate::tracer::{AttemptOutcome, Tracer, CATEGORY_CONFIG_SERVICES, CATEGORY_EXCEPTION};

/// Attempts per lookup.
pub const MAX_ATTEMPTS: usize = 2;
/// Path of the discovery endpoint on the meta service.
pub const DISCOVERY_PATH: &str = "/services/config";

/// Builds `{domain}/services/config?appId=..[&ip=..]` with form-encoded values.
///
/// `ip` is left out entirely when `local_ip` is `None` or blank.
pub fn assemble_discovery_url(domain: &str, app_id: &str, local_ip: Option<&str>) -> String {
    let mut url = format!(
        "{}{}?appId={}",
        domain.trim_end_matches('/'),
        DISCOVERY_PATH,
        escape(app_id)
    );
    if let Some(ip) = local_ip.filter(|ip| !ip.trim().is_empty()) {
        url.push_str("&ip=");
        url.push_str(&escape(ip));
    }
    url
}

fn escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Looks up config service endpoints from the meta service and publishes them
/// to the shared [`AddressCache`].
///
/// Only one lookup runs at a time per locator; concurrent callers queue behind it.
pub struct RemoteLocator {
    meta_domain: String,
    app_id: String,
    local_ip: Option<String>,
    retry_interval: Duration,
    http: Arc<dyn HttpClient>,
    cache: Arc<AddressCache>,
    tracer: Arc<dyn Tracer>,
    lookup_lock: Mutex<()>,
    interrupt: CancellationToken,
}

impl RemoteLocator {
    pub fn new(
        settings: &LocatorSettings,
        http: Arc<dyn HttpClient>,
        cache: Arc<AddressCache>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        Self {
            meta_domain: settings.meta_domain.clone(),
            app_id: settings.app_id.clone(),
            local_ip: settings.local_ip.clone(),
            retry_interval: retry_delay(settings.retry_interval),
            http,
            cache,
            tracer,
            lookup_lock: Mutex::new(()),
            interrupt: CancellationToken::new(),
        }
    }

    /// Cancelling `token` cuts any current and future retry delay short.
    pub fn with_interrupt(mut self, token: CancellationToken) -> Self {
        self.interrupt = token;
        self
    }

    pub fn discovery_url(&self) -> String {
        assemble_discovery_url(&self.meta_domain, &self.app_id, self.local_ip.as_deref())
    }

    /// Runs up to [`MAX_ATTEMPTS`] discovery attempts and publishes the first non-empty
    /// result. Returns the published set.
    ///
    /// Transport and decode failures are remembered; empty responses are retried but
    /// never replace a remembered failure. Every failed attempt is followed by the
    /// retry delay.
    pub async fn lookup(&self) -> Result<Arc<EndpointSet>, DiscoveryError> {
        let _guard = self.lookup_lock.lock().await;
        let url = self.discovery_url();
        let mut last: Option<AttemptError> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch(&url).await {
                Ok(endpoints) => {
                    self.tracer.record_attempt(&url, &AttemptOutcome::Success);
                    if let Some(published) = self.cache.replace(endpoints) {
                        self.log_published(&published);
                        return Ok(published);
                    }
                    tracing::debug!(url = %url, attempt, "empty config service response");
                    self.tracer.log_event(CATEGORY_CONFIG_SERVICES, "Empty response!");
                }
                Err(e) => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        error = %e,
                        "config service lookup attempt failed"
                    );
                    self.tracer.log_event(CATEGORY_EXCEPTION, &e.to_string());
                    self.tracer
                        .record_attempt(&url, &AttemptOutcome::Failure(e.to_string()));
                    last = Some(e);
                }
            }
            self.pause().await;
        }

        Err(DiscoveryError {
            url,
            attempts: MAX_ATTEMPTS,
            last,
        })
    }

    /// [`lookup`](Self::lookup) with the error logged and dropped. Returns whether a set
    /// was published.
    pub async fn try_lookup(&self) -> bool {
        match self.lookup().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    cause = ?e.last,
                    "config service lookup failed, keeping cached addresses"
                );
                self.tracer.log_event(CATEGORY_EXCEPTION, &e.to_string());
                false
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<EndpointSet, AttemptError> {
        match self.http.get(url).await? {
            Some(body) => decode_endpoints(&body),
            None => Ok(EndpointSet::new()),
        }
    }

    async fn pause(&self) {
        tokio::select! {
            _ = tokio::time::sleep(self.retry_interval) => {}
            _ = self.interrupt.cancelled() => {
                tracing::debug!("retry delay interrupted");
            }
        }
    }

    fn log_published(&self, endpoints: &EndpointSet) {
        tracing::info!(count = endpoints.len(), "config services updated");
        for endpoint in endpoints {
            tracing::debug!(
                url = %endpoint.homepage_url,
                instance = %endpoint.instance_id,
                "config service"
            );
            self.tracer
                .log_event(CATEGORY_CONFIG_SERVICES, &endpoint.homepage_url);
        }
    }
}

/// Decodes a JSON array of endpoint records. A blank body or `null` is an empty set;
/// records with a blank `homepageUrl` are dropped.
fn decode_endpoints(body: &str) -> Result<EndpointSet, AttemptError> {
    if body.trim().is_empty() {
        return Ok(EndpointSet::new());
    }
    let records: Option<Vec<ServiceEndpoint>> = serde_json::from_str(body)?;
    Ok(records
        .unwrap_or_default()
        .into_iter()
        .filter(|e| {
            let usable = !e.homepage_url.trim().is_empty();
            if !usable {
                tracing::warn!(
                    instance = %e.instance_id,
                    "dropping config service without homepage url"
                );
            }
            usable
        })
        .collect())
}
