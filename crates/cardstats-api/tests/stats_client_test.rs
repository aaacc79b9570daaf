// Integration tests for `StatsClient` using wiremock.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardstats_api::{ErrorKind, StatsClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StatsClient) {
    let server = MockServer::start().await;
    let client = StatsClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_hall_of_fame() {
    let (server, client) = setup().await;

    let body = json!({
        "rounds": [
            { "round": 1, "winner": ["Alice"] },
            { "round": 2, "winner": ["Bob", "Carol"] },
        ],
        "table": [
            {
                "player": "Alice",
                "rounds_played": 12,
                "wins": 4,
                "elo": 1043.5,
                "score_mean": 5.25,
                "score_sum": 63.0
            },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let hof = client.hall_of_fame().await.unwrap();

    assert_eq!(hof.rounds.len(), 2);
    assert_eq!(hof.rounds[1].winner, vec!["Bob", "Carol"]);
    assert_eq!(hof.table[0].player, "Alice");
    assert_eq!(hof.table[0].rounds_played, 12);
}

#[tokio::test]
async fn test_player_stats_with_encoded_name() {
    let (server, client) = setup().await;

    let body = json!({
        "cards": [{ "card": "Lightning Bolt", "count": 7 }],
        "n_rounds_played": 9,
        "n_wins": 2,
        "score_average": 4.78,
        "score_total": 43.0,
        "score_list": [3.0, 5.0, 6.0],
        "elo": 1011.2,
        "nemesis": [{ "player": "Bob", "n_matches": 5, "score": 1.4 }]
    });

    Mock::given(method("GET"))
        .and(path("/playerstats/Jace%20Beleren"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.player_stats("Jace Beleren").await.unwrap();

    assert_eq!(stats.n_rounds_played, 9);
    assert_eq!(stats.cards[0].card, "Lightning Bolt");
    assert_eq!(stats.nemesis[0].player, "Bob");
}

#[tokio::test]
async fn test_round() {
    let (server, client) = setup().await;

    let body = json!({
        "decks": [
            { "index": 1, "player": "Alice", "cards": ["Black Lotus", "Ancestral Recall", "Time Walk"] },
        ],
        "results": [
            { "index": 1, "values": [0.0, 3.0, 1.0] },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/round/17"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let round = client.round(17).await.unwrap();

    assert_eq!(round.decks[0].cards.len(), 3);
    assert_eq!(round.results[0].values, vec![0.0, 3.0, 1.0]);
}

#[tokio::test]
async fn test_popular_cards_percent_key() {
    let (server, client) = setup().await;

    let body = json!([
        { "card": "Lightning Bolt", "count": 12, "%": 4.5 },
        { "card": "Counterspell", "count": 9, "%": 3.375 },
    ]);

    Mock::given(method("GET"))
        .and(path("/popular_cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let cards = client.popular_cards().await.unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].card, "Lightning Bolt");
    assert_eq!(cards[0].count, 12);
    assert!((cards[0].percent - 4.5).abs() < f64::EPSILON);
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_kind() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.hall_of_fame().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http(500));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn test_decode_error_kind() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/popular_cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.popular_cards().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_decode_error_with_multibyte_body() {
    let (server, client) = setup().await;

    // Non-JSON body whose 200th byte falls inside a two-byte 'é'. The
    // error must carry a truncated preview, not panic on the slice.
    let body = format!("{}ééé ist kein JSON", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/hall_of_fame"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.hall_of_fame().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("body preview"));
}

#[tokio::test]
async fn test_network_error_kind() {
    // Nothing listens on this port.
    let client =
        StatsClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let err = client.hall_of_fame().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
