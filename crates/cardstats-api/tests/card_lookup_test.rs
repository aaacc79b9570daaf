// Integration tests for `CardLookupClient` using wiremock.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardstats_api::{CardLookupClient, ErrorKind, ImageSize};

async fn setup() -> (MockServer, CardLookupClient) {
    let server = MockServer::start().await;
    let client = CardLookupClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_named_exact_with_prints_uri() {
    let (server, client) = setup().await;

    let prints_uri = format!("{}/cards/search?order=released&q=bolt", server.uri());
    let body = json!({
        "name": "Lightning Bolt",
        "prints_search_uri": prints_uri,
        "image_uris": { "small": "http://img/s.jpg", "normal": "http://img/n.jpg" }
    });

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .and(query_param("exact", "Lightning Bolt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let card = client.named_exact("Lightning Bolt").await.unwrap();

    assert_eq!(card.name.as_deref(), Some("Lightning Bolt"));
    assert!(card.prints_search_uri.is_some());
    let uris = card.image_uris.unwrap();
    assert_eq!(uris.url_for(ImageSize::Normal), Some("http://img/n.jpg"));
}

#[tokio::test]
async fn test_prints_page_preserves_order() {
    let (server, client) = setup().await;

    let body = json!({
        "data": [
            { "image_uris": { "normal": "http://img/newest.jpg" } },
            { "image_uris": { "normal": "http://img/middle.jpg" } },
            { "image_uris": { "normal": "http://img/oldest.jpg" } },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let uri = format!("{}/cards/search", server.uri()).parse().unwrap();
    let page = client.prints(&uri).await.unwrap();

    assert_eq!(page.data.len(), 3);
    let last = page.data.last().unwrap();
    assert_eq!(
        last.image_uris.as_ref().unwrap().url_for(ImageSize::Normal),
        Some("http://img/oldest.jpg")
    );
}

#[tokio::test]
async fn test_unknown_card_is_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error", "code": "not_found"
        })))
        .mount(&server)
        .await;

    let err = client.named_exact("No Such Card").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http(404));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_missing_optional_fields_deserialize() {
    let (server, client) = setup().await;

    // A card with a single printing carries no prints_search_uri.
    Mock::given(method("GET"))
        .and(path("/cards/named"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "One-Off"
        })))
        .mount(&server)
        .await;

    let card = client.named_exact("One-Off").await.unwrap();
    assert!(card.prints_search_uri.is_none());
    assert!(card.image_uris.is_none());
}
