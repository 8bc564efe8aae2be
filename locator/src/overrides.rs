//! Static address overrides: a fixed endpoint list that bypasses remote discovery.
//!
//! Sources are consulted in order and the first one with a non-blank value wins:
//!
//! 1. process property `apollo.configService` ([`crate::properties`])
//! 2. environment variable `APOLLO_CONFIGSERVICE`
//! 3. `apollo.configService` in the host's `server.properties`
//!
//! The value is a comma-separated URL list.

use std::sync::Arc;

use env_config::ServerProperties;

use crate::endpoint::{EndpointSet, ServiceEndpoint, CONFIG_SERVICE_APP_NAME};
use crate::properties;

/// Property key for the process-level and `server.properties` overrides.
pub const CONFIG_SERVICE_PROPERTY: &str = "apollo.configService";
/// Environment variable override.
pub const CONFIG_SERVICE_ENV: &str = "APOLLO_CONFIGSERVICE";

/// One place an override value can come from.
pub trait OverrideSource: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Raw value, if this source has one.
    fn lookup(&self) -> Option<String>;
}

/// Reads a key from the process-level property registry.
pub struct ProcessProperty(pub String);

impl OverrideSource for ProcessProperty {
    fn name(&self) -> &str {
        "process property"
    }

    fn lookup(&self) -> Option<String> {
        properties::property(&self.0)
    }
}

/// Reads an environment variable.
pub struct EnvVar(pub String);

impl OverrideSource for EnvVar {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self) -> Option<String> {
        std::env::var(&self.0).ok()
    }
}

/// Reads a key from `server.properties`, with no default.
pub struct ServerProperty {
    pub properties: Arc<ServerProperties>,
    pub key: String,
}

impl OverrideSource for ServerProperty {
    fn name(&self) -> &str {
        "server.properties"
    }

    fn lookup(&self) -> Option<String> {
        self.properties.get_or(&self.key, None).map(str::to_string)
    }
}

/// Wraps a closure as a source.
pub struct FnSource<F> {
    name: String,
    f: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> OverrideSource for FnSource<F>
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self) -> Option<String> {
        (self.f)()
    }
}

/// Checks override sources in priority order.
pub struct OverrideResolver {
    sources: Vec<Box<dyn OverrideSource>>,
    app_name: String,
}

impl OverrideResolver {
    pub fn new(sources: Vec<Box<dyn OverrideSource>>) -> Self {
        Self {
            sources,
            app_name: CONFIG_SERVICE_APP_NAME.to_string(),
        }
    }

    /// App name stamped on every override endpoint.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Process property, then environment, then `server.properties`.
    pub fn default_sources(
        server_properties: Arc<ServerProperties>,
    ) -> Vec<Box<dyn OverrideSource>> {
        vec![
            Box::new(ProcessProperty(CONFIG_SERVICE_PROPERTY.to_string())),
            Box::new(EnvVar(CONFIG_SERVICE_ENV.to_string())),
            Box::new(ServerProperty {
                properties: server_properties,
                key: CONFIG_SERVICE_PROPERTY.to_string(),
            }),
        ]
    }

    /// Endpoints from the first source with a usable value, or `None` to fall back to
    /// remote discovery. Later sources are not consulted once one matches.
    pub fn resolve(&self) -> Option<EndpointSet> {
        let (source, value) = self.sources.iter().find_map(|source| {
            source
                .lookup()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (source.name(), v))
        })?;

        let endpoints = parse_override(&value, &self.app_name);
        if endpoints.is_empty() {
            tracing::warn!(
                source,
                value = %value,
                "config service override has no usable URL, ignoring it"
            );
            return None;
        }

        tracing::warn!(
            source,
            value = %value,
            "config services located from override, remote refresh disabled"
        );
        Some(endpoints)
    }
}

/// Splits a comma-separated URL list into endpoints; blank entries are skipped.
fn parse_override(value: &str, app_name: &str) -> EndpointSet {
    value
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| ServiceEndpoint::from_url(url, app_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use tracing_subscriber::layer::SubscriberExt;

    /// Collects the level and message of every event.
    struct CapturingLayer {
        events: Arc<Mutex<Vec<(tracing::Level, String)>>>,
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CapturingLayer {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            struct Message(String);

            impl tracing::field::Visit for Message {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.0 = format!("{value:?}");
                    }
                }
            }

            let mut message = Message(String::new());
            event.record(&mut message);
            self.events
                .lock()
                .unwrap()
                .push((*event.metadata().level(), message.0));
        }
    }

    fn with_captured_events<F, R>(f: F) -> (R, Vec<(tracing::Level, String)>)
    where
        F: FnOnce() -> R,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let layer = CapturingLayer {
            events: events.clone(),
        };
        let subscriber = tracing_subscriber::registry().with(layer);
        let result = tracing::subscriber::with_default(subscriber, f);
        let captured = events.lock().unwrap().clone();
        (result, captured)
    }

    fn fixed(name: &str, value: Option<&str>) -> Box<dyn OverrideSource> {
        let value = value.map(str::to_string);
        Box::new(FnSource::new(name, move || value.clone()))
    }

    #[test]
    fn parses_trimmed_url_list() {
        let resolver =
            OverrideResolver::new(vec![fixed("a", Some("http://a:8080, http://b:8080"))]);
        let set = resolver.resolve().unwrap();
        assert_eq!(
            set,
            vec![
                ServiceEndpoint::new("http://a:8080", "configservice", "http://a:8080"),
                ServiceEndpoint::new("http://b:8080", "configservice", "http://b:8080"),
            ]
        );
    }

    #[test]
    fn first_non_empty_source_wins_and_later_ones_are_not_consulted() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = later_calls.clone();
        let resolver = OverrideResolver::new(vec![
            fixed("first", None),
            fixed("second", Some("")),
            fixed("third", Some("http://third")),
            Box::new(FnSource::new("fourth", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Some("http://fourth".to_string())
            })),
        ]);

        let set = resolver.resolve().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].homepage_url, "http://third");
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn applied_override_warns_that_remote_refresh_is_disabled() {
        let resolver = OverrideResolver::new(vec![fixed("env", Some("http://a:8080"))]);
        let (set, events) = with_captured_events(|| resolver.resolve());

        assert!(set.is_some());
        assert!(events.iter().any(|(level, message)| {
            *level == tracing::Level::WARN && message.contains("remote refresh disabled")
        }));
    }

    #[test]
    fn no_refresh_warning_without_an_override() {
        let resolver = OverrideResolver::new(vec![fixed("env", None)]);
        let (set, events) = with_captured_events(|| resolver.resolve());

        assert!(set.is_none());
        assert!(!events
            .iter()
            .any(|(_, message)| message.contains("remote refresh disabled")));
    }

    #[test]
    fn no_value_anywhere_means_no_override() {
        let resolver = OverrideResolver::new(vec![fixed("a", None), fixed("b", Some("   "))]);
        assert!(resolver.resolve().is_none());
    }

    #[test]
    fn value_with_only_blank_entries_means_no_override() {
        let resolver = OverrideResolver::new(vec![fixed("a", Some(" , ,"))]);
        assert!(resolver.resolve().is_none());
    }

    #[test]
    fn blank_entries_are_skipped() {
        let resolver = OverrideResolver::new(vec![fixed("a", Some("http://a,,http://b,"))]);
        let urls: Vec<_> = resolver
            .resolve()
            .unwrap()
            .into_iter()
            .map(|e| e.homepage_url)
            .collect();
        assert_eq!(urls, vec!["http://a", "http://b"]);
    }

    #[test]
    fn custom_app_name_is_applied() {
        let resolver =
            OverrideResolver::new(vec![fixed("a", Some("http://a"))]).with_app_name("custom-tier");
        assert_eq!(resolver.resolve().unwrap()[0].app_name, "custom-tier");
    }

    #[test]
    fn server_property_source_reads_properties() {
        let props = Arc::new(ServerProperties::from_pairs([(
            CONFIG_SERVICE_PROPERTY,
            "http://from-file:8080",
        )]));
        let source = ServerProperty {
            properties: props,
            key: CONFIG_SERVICE_PROPERTY.to_string(),
        };
        assert_eq!(source.lookup().as_deref(), Some("http://from-file:8080"));
    }

    #[test]
    fn process_property_source_reads_registry() {
        let key = "overrides.test.process_property";
        properties::set_property(key, "http://from-process");
        let source = ProcessProperty(key.to_string());
        assert_eq!(source.lookup().as_deref(), Some("http://from-process"));
        properties::clear_property(key);
        assert_eq!(source.lookup(), None);
    }

    #[test]
    fn default_sources_are_in_priority_order() {
        let sources = OverrideResolver::default_sources(Arc::new(ServerProperties::empty()));
        let names: Vec<_> = sources.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["process property", "environment", "server.properties"]);
    }
}
