//! # Locator
//!
//! Resolves the addresses of the config service tier a client must talk to, and keeps them
//! fresh without making callers wait on the network for every access.
//!
//! ## How addresses are resolved
//!
//! - **Override**: if a static URL list is configured ([`overrides`]), it is used as is for
//!   the lifetime of the locator and no remote lookups ever happen.
//! - **Dynamic**: otherwise the meta service is asked for the current instances
//!   ([`RemoteLocator`]), once eagerly at start and then periodically in the background
//!   ([`PeriodicRefresher`]). Failures there are logged and swallowed.
//!
//! [`ServiceLocator::get_endpoints`] serves the cached set; only when the cache is empty does
//! it run a lookup on the caller's task and return its [`DiscoveryError`].
//!
//! ## Main modules
//!
//! - [`cache`]: [`AddressCache`], the atomically swapped current endpoint set.
//! - [`overrides`]: [`OverrideResolver`], [`OverrideSource`] and the built-in sources.
//! - [`remote`]: [`RemoteLocator`], bounded-retry discovery against the meta service.
//! - [`refresher`]: [`PeriodicRefresher`].
//! - [`service`]: [`ServiceLocator`] façade and its builder.
//! - [`http`]: [`HttpClient`] seam and the reqwest implementation.
//! - [`tracer`]: [`Tracer`] trace sink.
//! - [`properties`]: process-level property registry.
//!
//! # Example
//!
//! ```ignore
//! use locator::ServiceLocator;
//!
//! let settings = locator::LocatorSettings::load("config-locator")?;
//! let locator = ServiceLocator::builder(settings).start().await?;
//! for endpoint in locator.get_endpoints().await?.iter() {
//!     println!("{}", endpoint.homepage_url);
//! }
//! ```

pub mod cache;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod overrides;
pub mod properties;
pub mod refresher;
pub mod remote;
pub mod service;
pub mod tracer;

pub use cache::AddressCache;
pub use endpoint::{EndpointSet, ServiceEndpoint, CONFIG_SERVICE_APP_NAME};
pub use error::{AttemptError, DiscoveryError, HttpError};
pub use http::{HttpClient, ReqwestHttpClient};
pub use overrides::{
    EnvVar, FnSource, OverrideResolver, OverrideSource, ProcessProperty, ServerProperty,
    CONFIG_SERVICE_ENV, CONFIG_SERVICE_PROPERTY,
};
pub use refresher::PeriodicRefresher;
pub use remote::{assemble_discovery_url, RemoteLocator, DISCOVERY_PATH, MAX_ATTEMPTS};
pub use service::{LocatorMode, ServiceLocator, ServiceLocatorBuilder};
pub use tracer::{AttemptOutcome, NoopTracer, Tracer, TracingTracer};

/// Settings types, re-exported so callers need not depend on the config crate directly.
pub use env_config::{LocatorSettings, ServerProperties, TimeUnit};
