//! Trace sink: fire-and-forget structured events about discovery activity.

/// Category for per-attempt discovery records.
pub const CATEGORY_GET_CONFIG_SERVICE: &str = "MetaService.getConfigService";
/// Category for refresher ticks.
pub const CATEGORY_META_SERVICE: &str = "MetaService";
/// Category for published endpoint URLs and empty responses.
pub const CATEGORY_CONFIG_SERVICES: &str = "Config.Services";
/// Category for attempt failure details.
pub const CATEGORY_EXCEPTION: &str = "LocatorException";

/// Outcome of one discovery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure(String),
}

/// Receives trace events. Implementations must not block or panic.
pub trait Tracer: Send + Sync {
    fn log_event(&self, category: &str, payload: &str);

    /// One discovery attempt against `url` finished with `outcome`.
    fn record_attempt(&self, url: &str, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Success => self.log_event(CATEGORY_GET_CONFIG_SERVICE, url),
            AttemptOutcome::Failure(reason) => {
                self.log_event(CATEGORY_GET_CONFIG_SERVICE, &format!("{url} failed: {reason}"))
            }
        }
    }
}

/// Forwards trace events to `tracing` under target `locator::trace`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn log_event(&self, category: &str, payload: &str) {
        tracing::debug!(target: "locator::trace", category, payload, "trace event");
    }

    fn record_attempt(&self, url: &str, outcome: &AttemptOutcome) {
        match outcome {
            AttemptOutcome::Success => tracing::debug!(
                target: "locator::trace",
                category = CATEGORY_GET_CONFIG_SERVICE,
                url,
                status = "success",
                "discovery attempt"
            ),
            AttemptOutcome::Failure(reason) => tracing::debug!(
                target: "locator::trace",
                category = CATEGORY_GET_CONFIG_SERVICE,
                url,
                status = "failure",
                reason = %reason,
                "discovery attempt"
            ),
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn log_event(&self, _category: &str, _payload: &str) {}

    fn record_attempt(&self, _url: &str, _outcome: &AttemptOutcome) {}
}
