// Behavior tests for RemoteResource: stale-result discard, endpoint
// identity, error classification, and unmount safety. All network
// traffic goes through wiremock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardstats_api::{ErrorKind, StatsClient};
use cardstats_core::{RemoteResource, ResourceState};

async fn setup() -> (MockServer, StatsClient) {
    let server = MockServer::start().await;
    let client = StatsClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

/// Wait until the resource leaves Idle/Loading, with a hard cap.
async fn settle(resource: &RemoteResource<Value>) -> ResourceState<Value> {
    let mut rx = resource.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = rx.borrow_and_update();
                match &*state {
                    ResourceState::Ready(_) | ResourceState::Failed(_) => return state.clone(),
                    _ => {}
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("resource never settled")
}

#[tokio::test]
async fn stale_result_is_discarded() {
    let (server, client) = setup().await;

    // Endpoint A answers slowly, endpoint B instantly.
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"from": "slow"}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"from": "fast"})))
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("slow");
    tokio::time::sleep(Duration::from_millis(50)).await;
    resource.set_endpoint("fast");

    let state = settle(&resource).await;
    assert_eq!(state.data().unwrap()["from"], "fast");

    // Let the slow response arrive; it must not overwrite the fast one.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(resource.state().data().unwrap()["from"], "fast");
}

#[tokio::test]
async fn same_endpoint_fetches_once() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("hall_of_fame");
    resource.set_endpoint("hall_of_fame");

    let state = settle(&resource).await;
    assert!(state.data().is_some());
    assert_eq!(resource.endpoint().as_deref(), Some("hall_of_fame"));

    server.verify().await;
}

#[tokio::test]
async fn reload_refetches_current_endpoint() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/popular_cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(2)
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("popular_cards");
    settle(&resource).await;

    resource.reload();
    settle(&resource).await;

    server.verify().await;
}

#[tokio::test]
async fn failure_surfaces_kind_and_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/round/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("round/3");

    let state = settle(&resource).await;
    let ResourceState::Failed(failure) = state else {
        panic!("expected Failed state");
    };
    assert_eq!(failure.kind, ErrorKind::Http(500));
    assert!(failure.message.contains("backend exploded"));
}

#[tokio::test]
async fn decode_failure_is_distinguishable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("hall_of_fame");

    let state = settle(&resource).await;
    let ResourceState::Failed(failure) = state else {
        panic!("expected Failed state");
    };
    assert_eq!(failure.kind, ErrorKind::Decode);
}

#[tokio::test]
async fn payload_type_does_not_need_clone() {
    // Payloads travel behind an Arc; a resource over a non-Clone type
    // must still expose state snapshots.
    #[derive(Debug, serde::Deserialize)]
    struct Opaque {
        ok: bool,
    }

    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let resource: RemoteResource<Opaque> = RemoteResource::new(client);
    resource.set_endpoint("hall_of_fame");

    let mut rx = resource.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if resource.state().data().is_some() {
                break;
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("resource never settled");

    assert!(resource.state().data().unwrap().ok);
}

#[tokio::test]
async fn dropped_resource_is_never_mutated() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"from": "slow"}))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let resource: RemoteResource<Value> = RemoteResource::new(client);
    resource.set_endpoint("slow");
    let rx = resource.subscribe();
    assert!(rx.borrow().is_loading());

    drop(resource);

    // The response lands after the drop; the last published state must
    // still be Loading — no mutation on an unmounted target.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(rx.borrow().is_loading());
}
