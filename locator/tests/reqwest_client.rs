//! `ReqwestHttpClient` and `RemoteLocator` against a local HTTP meta service.


use std::sync::Arc;
use std::time::Duration;

use locator::{
    AddressCache, AttemptError, HttpClient, HttpError, LocatorSettings, NoopTracer,
    RemoteLocator, ReqwestHttpClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SERVICES: &str = r#"[
    {"homepageUrl":"http://10.2.0.1:8080/","appName":"APOLLO-CONFIGSERVICE","instanceId":"cs-a"}
]"#;

fn remote(server: &MockServer, cache: Arc<AddressCache>) -> RemoteLocator {
    let settings = LocatorSettings::default()
        .with_meta_domain(server.uri())
        .with_app_id("sample app")
        .with_local_ip("10.0.0.9")
        .with_retry_interval(Duration::from_millis(10));
    let http = Arc::new(ReqwestHttpClient::new().expect("http client"));
    RemoteLocator::new(&settings, http, cache, Arc::new(NoopTracer))
}

#[tokio::test]
async fn lookup_decodes_service_list_from_meta_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/config"))
        .and(query_param("appId", "sample app"))
        .and(query_param("ip", "10.0.0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SERVICES))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(AddressCache::new());
    let published = remote(&server, cache.clone()).lookup().await.unwrap();

    assert_eq!(published.len(), 1);
    assert_eq!(published[0].homepage_url, "http://10.2.0.1:8080/");
    assert_eq!(published[0].instance_id, "cs-a");
    assert!(Arc::ptr_eq(&published, &cache.read()));
}

#[tokio::test]
async fn server_error_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/config"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let cache = Arc::new(AddressCache::new());
    let err = remote(&server, cache.clone()).lookup().await.unwrap_err();

    assert!(matches!(
        err.last,
        Some(AttemptError::Http(HttpError::Status { status: 503, .. }))
    ));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn not_modified_is_an_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let body = client
        .get(&format!("{}/services/config?appId=x", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, None);
}

#[tokio::test]
async fn unreachable_meta_service_is_a_transport_error() {
    let client =
        ReqwestHttpClient::with_timeouts(Duration::from_millis(200), Duration::from_millis(500))
            .unwrap();
    let err = client
        .get("http://127.0.0.1:9/services/config?appId=x")
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Transport(_)));
}
