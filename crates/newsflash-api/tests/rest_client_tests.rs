//! Integration tests for the REST client against a mock server

use std::sync::Arc;

use newsflash_api::{
    ApiError, CallAdapter, EmptyBodyConverter, JsonConverter, RestClient,
};
use newsflash_http::HttpClient;
use serde::Deserialize;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Headlines {
    status: String,
    #[serde(rename = "totalResults")]
    total_results: u32,
}

fn rest_client(server: &MockServer) -> RestClient {
    let http = Arc::new(HttpClient::builder().build().unwrap());
    RestClient::builder()
        .client(http)
        .call_adapter(CallAdapter::current().unwrap())
        .converter(Arc::new(EmptyBodyConverter))
        .converter(Arc::new(JsonConverter))
        .base_url(Url::parse(&server.uri()).unwrap())
        .build()
        .unwrap()
}

#[tokio::test]
async fn typed_get_decodes_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"status":"ok","totalResults":7}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let headlines: Option<Headlines> = client.get("/v2/top-headlines").await.unwrap();

    assert_eq!(
        headlines,
        Some(Headlines {
            status: "ok".to_string(),
            total_results: 7
        })
    );
}

#[tokio::test]
async fn empty_body_yields_the_absent_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/nothing"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let headlines: Option<Headlines> = client.get("/v2/nothing").await.unwrap();

    assert_eq!(headlines, None);
}

#[tokio::test]
async fn malformed_body_propagates_the_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let client = rest_client(&server);
    let result: Result<Option<Headlines>, _> = client.get("/").await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn base_url_is_held_for_the_client_lifetime() {
    let server = MockServer::start().await;
    let client = rest_client(&server);

    assert_eq!(client.base_url().as_str(), format!("{}/", server.uri()));
}

#[tokio::test]
async fn builder_rejects_missing_components() {
    let result = RestClient::builder().build();
    assert!(matches!(result, Err(ApiError::Builder { .. })));

    let http = Arc::new(HttpClient::builder().build().unwrap());
    let result = RestClient::builder()
        .client(http)
        .call_adapter(CallAdapter::current().unwrap())
        .base_url(Url::parse("https://newsapi.org/").unwrap())
        .build();
    assert!(matches!(result, Err(ApiError::Builder { .. })));
}
