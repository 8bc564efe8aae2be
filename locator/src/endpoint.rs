//! Service endpoint: one resolved config service instance.

use serde::{Deserialize, Serialize};

/// App name attached to endpoints that come from a static override.
pub const CONFIG_SERVICE_APP_NAME: &str = "configservice";

/// One resolved config service instance, as returned by the meta service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Base URL of the instance. Never empty once accepted by the locator.
    pub homepage_url: String,
    /// Service tier this instance belongs to.
    #[serde(default)]
    pub app_name: String,
    /// Opaque identity, used for logging and tracing only.
    #[serde(default)]
    pub instance_id: String,
}

impl ServiceEndpoint {
    pub fn new(
        homepage_url: impl Into<String>,
        app_name: impl Into<String>,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            homepage_url: homepage_url.into(),
            app_name: app_name.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Endpoint for a statically configured URL: the URL doubles as the instance id.
    pub fn from_url(url: &str, app_name: &str) -> Self {
        Self::new(url, app_name, url)
    }
}

/// Ordered endpoint list; order is response or override order.
pub type EndpointSet = Vec<ServiceEndpoint>;
