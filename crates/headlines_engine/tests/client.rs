use std::collections::HashSet;
use std::time::Duration;

use headlines_core::Category;
use headlines_engine::{ClientSettings, FailureKind, NewsClient, ReqwestNewsClient};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article_json(n: usize) -> Value {
    json!({
        "source": {"id": null, "name": "Wire"},
        "author": null,
        "title": format!("Story {n}"),
        "description": "desc",
        "url": format!("https://news.example.com/{n}"),
        "urlToImage": null,
        "publishedAt": "2024-05-01T10:00:00Z",
        "content": null
    })
}

fn ok_envelope(count: usize) -> Value {
    json!({
        "status": "ok",
        "totalResults": 57,
        "articles": (1..=count).map(article_json).collect::<Vec<_>>()
    })
}

fn client_for(server: &MockServer) -> ReqwestNewsClient {
    ReqwestNewsClient::new(ClientSettings::new(server.uri(), "test-key")).expect("client")
}

#[tokio::test]
async fn latest_sends_country_and_api_key_and_assigns_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param_is_missing("page"))
        .and(query_param_is_missing("category"))
        .and(header("X-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(3)))
        .expect(1)
        .mount(&server)
        .await;

    let articles = client_for(&server).fetch_latest().await.expect("fetch ok");

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].title, "Story 1");
    assert_eq!(articles[2].url, "https://news.example.com/3");
    let ids: HashSet<_> = articles.iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids.len(), 3);
    assert!(articles.iter().all(|a| a.id.starts_with("id-")));
}

#[tokio::test]
async fn category_variant_filters_without_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("category", "health"))
        .and(query_param_is_missing("pageSize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(2)))
        .expect(1)
        .mount(&server)
        .await;

    let articles = client_for(&server)
        .fetch_latest_by_category(Category::Health)
        .await
        .expect("fetch ok");
    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn paginated_variants_send_page_and_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param_is_missing("category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(10)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("page", "3"))
        .and(query_param("pageSize", "10"))
        .and(query_param("category", "sports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(4)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.fetch_latest_paginated(2).await.unwrap().len(), 10);
    assert_eq!(
        client
            .fetch_latest_paginated_by_category(3, Category::Sports)
            .await
            .unwrap()
            .len(),
        4
    );
}

#[tokio::test]
async fn empty_or_missing_articles_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("page", "9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ok", "totalResults": 0})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok", "totalResults": 0, "articles": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.fetch_latest_paginated(9).await.unwrap().is_empty());
    assert!(client.fetch_latest().await.unwrap().is_empty());
}

#[tokio::test]
async fn null_text_fields_do_not_reject_the_page() {
    let server = MockServer::start().await;
    let mut body = ok_envelope(3);
    body["articles"][1]["title"] = Value::Null;
    body["articles"][1]["source"]["name"] = Value::Null;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let articles = client_for(&server).fetch_latest().await.expect("fetch ok");

    assert_eq!(articles.len(), 3);
    assert_eq!(articles[1].title, "");
    assert_eq!(articles[1].source.name, "");
    assert_eq!(articles[1].url, "https://news.example.com/2");
}

#[tokio::test]
async fn error_envelope_carries_message_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "code": "parametersMissing",
            "message": "Required parameters are missing."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Api);
    assert_eq!(err.message, "Required parameters are missing.");
    assert_eq!(err.code.as_deref(), Some("parametersMissing"));
    assert_eq!(err.to_string(), "Required parameters are missing.");
}

#[tokio::test]
async fn error_envelope_without_message_is_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Api);
    assert_eq!(err.message, "Unknown error");
    assert_eq!(err.code, None);
}

#[tokio::test]
async fn http_error_uses_body_message_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert_eq!(err.message, "Your API key is invalid or incorrect.");
    assert_eq!(err.code.as_deref(), Some("apiKeyInvalid"));
}

#[tokio::test]
async fn http_error_without_body_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "Network Error");
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert_eq!(err.message, "Unknown error");
}

#[tokio::test]
async fn slow_response_times_out_when_timeout_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(ok_envelope(1)),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::new(server.uri(), "test-key")
    };
    let client = ReqwestNewsClient::new(settings).unwrap();

    let err = client.fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(err.message, "Network Error");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ReqwestNewsClient::new(ClientSettings::new(uri, "test-key")).unwrap();
    let err = client.fetch_latest().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
    assert_eq!(err.message, "Network Error");
}

#[tokio::test]
async fn ids_do_not_repeat_across_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(5)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.fetch_latest().await.unwrap();
    let second = client.fetch_latest().await.unwrap();

    let ids: HashSet<_> = first.iter().chain(second.iter()).map(|a| a.id.clone()).collect();
    assert_eq!(ids.len(), 10);
    // Same stories, so identity by url is unchanged.
    assert_eq!(first[0].url, second[0].url);
}
