//! Error types for discovery lookups.

use thiserror::Error;

/// Failure reported by an [`HttpClient`](crate::HttpClient). Opaque to the locator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// Connection, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Server answered with a status the locator cannot use.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
}

/// Why a single discovery attempt failed. Retried; the last one is remembered.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("decode service list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Every discovery attempt for one lookup was used up without a usable response.
///
/// `last` is the most recent transport or decode failure. Empty responses never
/// overwrite it, so it may be `None` when every attempt came back empty.
#[derive(Debug, Error)]
#[error("get config services failed from {url} after {attempts} attempts")]
pub struct DiscoveryError {
    pub url: String,
    pub attempts: usize,
    #[source]
    pub last: Option<AttemptError>,
}
