#![allow(clippy::unwrap_used)]
// Integration tests for `StatusFetcher` and `Plugin` against a wiremock
// stand-in for the Chinachu WUI.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chinachu_api::{ChinachuClient, TransportConfig};
use chinachu_metrics::{
    Endpoint, EndpointSet, MetricsError, Plugin, PluginOutput, Snapshot, StatusFetcher, names,
};

// ── Fixtures ────────────────────────────────────────────────────────

fn status_body() -> Value {
    json!({
        "connectedCount": 1,
        "feature": {
            "previewer": true,
            "streamer": true,
            "filer": true,
            "configurator": true
        },
        "system": { "core": 4 },
        "operator": { "alive": true, "pid": 1122 },
        "wui": { "alive": false, "pid": null }
    })
}

fn program(id: &str, episode: Option<i64>) -> Value {
    json!({
        "id": id,
        "category": "anime",
        "title": "test title",
        "fullTitle": "test title #1 「ほげ」",
        "detail": "detail",
        "start": 1_507_390_200_000_i64,
        "end": 1_507_392_000_000_i64,
        "seconds": 1800,
        "extra": { "出演者": "うんこ太郎" },
        "channel": {
            "type": "GR",
            "channel": "16",
            "name": "ＴＯＫＹＯ　ＭＸ１",
            "id": "1hkhnrs",
            "sid": 23608,
            "nid": 32391,
            "hasLogoData": true,
            "n": 32
        },
        "subTitle": "ほげ",
        "episode": episode,
        "flags": [""],
        "isConflict": false,
        "recordedFormat": "",
        "priority": 2,
        "tuner": { "name": "Mirakurun (UnixSocket)", "command": "*", "isScrambling": false },
        "recorded": "/opt/tv/1.m2ts"
    })
}

fn rule() -> Value {
    json!({
        "types": ["GR"],
        "categories": ["anime"],
        "channels": ["1hkhnrs"],
        "ignore_flags": ["再"],
        "hour": { "start": 0, "end": 24 },
        "reserve_titles": ["たいとるの部分"],
        "recorded_format": ""
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn mount(server: &MockServer, endpoint: &str, body: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{endpoint}.json")))
        .respond_with(body)
        .mount(server)
        .await;
}

async fn mount_all(server: &MockServer) {
    let ok = |v: Value| ResponseTemplate::new(200).set_body_json(v);
    mount(server, "status", ok(status_body())).await;
    mount(
        server,
        "recorded",
        ok(json!([program("36tfa8hbsd", Some(1)), program("36tfa8hbse", Some(2))])),
    )
    .await;
    mount(server, "recording", ok(json!([program("36tfa8h0oi", Some(3))]))).await;
    mount(server, "rules", ok(json!([rule(), rule()]))).await;
    mount(server, "reserves", ok(json!([program("3826py3vi7", None)]))).await;
}

fn fetcher(server: &MockServer, endpoints: EndpointSet) -> StatusFetcher {
    let client =
        ChinachuClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    StatusFetcher::new(client, endpoints)
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_all_endpoints() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let metrics = fetcher(&server, EndpointSet::all()).fetch().await.unwrap();

    let expected = [
        (names::CONNECTED_COUNT, 1),
        (names::PREVIEWER, 1),
        (names::STREAMER, 1),
        (names::FILER, 1),
        (names::CONFIGURATOR, 1),
        (names::RECORDED_COUNT, 2),
        (names::RECORDING_COUNT, 1),
        (names::RULES_COUNT, 2),
        (names::RESERVES_COUNT, 1),
    ];
    for (name, value) in expected {
        assert_eq!(metrics.get(name), Some(value), "metric {name}");
    }
    assert_eq!(metrics.len(), expected.len());
}

#[tokio::test]
async fn test_fetch_via_host_port_target() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let target = server.address().to_string();
    let fetcher =
        StatusFetcher::connect(&target, &TransportConfig::default(), EndpointSet::status_only())
            .unwrap();
    let metrics = fetcher.fetch().await.unwrap();

    assert_eq!(metrics.get(names::CONNECTED_COUNT), Some(1));
    assert_eq!(metrics.len(), 5);
}

#[tokio::test]
async fn test_feature_flags_false() {
    let server = MockServer::start().await;
    mount(
        &server,
        "status",
        ResponseTemplate::new(200).set_body_json(json!({
            "connectedCount": 0,
            "feature": {
                "previewer": false,
                "streamer": true,
                "filer": false,
                "configurator": false
            }
        })),
    )
    .await;

    let metrics = fetcher(&server, EndpointSet::status_only())
        .fetch()
        .await
        .unwrap();

    assert_eq!(metrics.get(names::CONNECTED_COUNT), Some(0));
    assert_eq!(metrics.get(names::PREVIEWER), Some(0));
    assert_eq!(metrics.get(names::STREAMER), Some(1));
    assert_eq!(metrics.get(names::FILER), Some(0));
    assert_eq!(metrics.get(names::CONFIGURATOR), Some(0));
}

#[tokio::test]
async fn test_disabled_endpoints_are_not_requested() {
    let server = MockServer::start().await;
    let ok = |v: Value| ResponseTemplate::new(200).set_body_json(v);

    Mock::given(method("GET"))
        .and(path("/api/status.json"))
        .respond_with(ok(status_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recorded.json"))
        .respond_with(ok(json!([program("a", None)])))
        .expect(1)
        .mount(&server)
        .await;
    for endpoint in ["recording", "rules", "reserves"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/{endpoint}.json")))
            .respond_with(ok(json!([])))
            .expect(0)
            .mount(&server)
            .await;
    }

    let metrics = fetcher(&server, EndpointSet::with_recorded())
        .fetch()
        .await
        .unwrap();

    assert_eq!(metrics.get(names::RECORDED_COUNT), Some(1));
    assert_eq!(metrics.get(names::RULES_COUNT), None);
    server.verify().await;
}

#[tokio::test]
async fn test_list_entries_with_unexpected_fields_are_counted() {
    let server = MockServer::start().await;
    let ok = |v: Value| ResponseTemplate::new(200).set_body_json(v);

    mount(&server, "status", ok(status_body())).await;
    mount(
        &server,
        "recorded",
        ok(json!([
            { "id": "a", "channel": { "sid": "23608" } },
            { "id": "b", "episode": "1", "isConflict": 0 }
        ])),
    )
    .await;
    mount(&server, "recording", ok(json!(null))).await;
    mount(
        &server,
        "rules",
        ok(json!([
            { "types": null, "hour": { "start": 20 } },
            { "hour": { "start": 0, "end": 300 } }
        ])),
    )
    .await;
    mount(&server, "reserves", ok(json!([{ "channel": [] }]))).await;

    let metrics = fetcher(&server, EndpointSet::all()).fetch().await.unwrap();

    assert_eq!(metrics.get(names::RECORDED_COUNT), Some(2));
    assert_eq!(metrics.get(names::RECORDING_COUNT), Some(0));
    assert_eq!(metrics.get(names::RULES_COUNT), Some(2));
    assert_eq!(metrics.get(names::RESERVES_COUNT), Some(1));
}

#[tokio::test]
async fn test_null_feature_reads_as_disabled() {
    let server = MockServer::start().await;
    mount(
        &server,
        "status",
        ResponseTemplate::new(200)
            .set_body_json(json!({ "connectedCount": null, "feature": null })),
    )
    .await;

    let metrics = fetcher(&server, EndpointSet::status_only())
        .fetch()
        .await
        .unwrap();

    for name in [
        names::CONNECTED_COUNT,
        names::PREVIEWER,
        names::STREAMER,
        names::FILER,
        names::CONFIGURATOR,
    ] {
        assert_eq!(metrics.get(name), Some(0), "metric {name}");
    }
}

#[tokio::test]
async fn test_fetch_is_idempotent() {
    let server = MockServer::start().await;
    mount_all(&server).await;

    let fetcher = fetcher(&server, EndpointSet::all());
    let first = fetcher.fetch().await.unwrap();
    let second = fetcher.fetch().await.unwrap();

    assert_eq!(first, second);
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_malformed_status_fails_whole_fetch() {
    let server = MockServer::start().await;
    mount(
        &server,
        "status",
        ResponseTemplate::new(200).set_body_string("{feature: [],}"),
    )
    .await;
    mount(
        &server,
        "recorded",
        ResponseTemplate::new(200).set_body_string("[]"),
    )
    .await;

    let result = fetcher(&server, EndpointSet::with_recorded()).fetch().await;

    match result {
        Err(MetricsError::Decode { endpoint, .. }) => assert_eq!(endpoint, Endpoint::Status),
        other => panic!("expected Decode error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_aborts_remaining_requests() {
    let server = MockServer::start().await;
    let ok = |v: Value| ResponseTemplate::new(200).set_body_json(v);

    mount(&server, "status", ok(status_body())).await;
    mount(
        &server,
        "recorded",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/recording.json"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = fetcher(&server, EndpointSet::all()).fetch().await.unwrap_err();

    assert!(
        matches!(err, MetricsError::Decode { endpoint: Endpoint::Recorded, .. }),
        "expected Decode error on recorded, got: {err:?}"
    );
    assert!(err.is_fetch_failure());
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_target_is_transport_error() {
    let server = MockServer::start().await;
    let target = server.address().to_string();
    drop(server);

    let fetcher =
        StatusFetcher::connect(&target, &TransportConfig::default(), EndpointSet::all()).unwrap();
    let err = fetcher.fetch().await.unwrap_err();

    assert!(
        matches!(err, MetricsError::Transport { endpoint: Endpoint::Status, .. }),
        "expected Transport error, got: {err:?}"
    );
}

#[test]
fn test_invalid_target_rejected_at_construction() {
    let err = StatusFetcher::connect(":10772", &TransportConfig::default(), EndpointSet::all())
        .unwrap_err();

    assert!(matches!(err, MetricsError::InvalidTarget(_)), "got: {err:?}");
    let message = err.to_string();
    assert_eq!(message.matches("Invalid target").count(), 1, "message: {message}");
    assert!(message.contains("':10772'"), "message: {message}");
    assert!(!err.is_fetch_failure());
}

// ── Plugin output ───────────────────────────────────────────────────

#[tokio::test]
async fn test_plugin_writes_value_lines() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let tempfile = dir.path().join("state");

    let plugin = Plugin::new(
        fetcher(&server, EndpointSet::all()),
        PluginOutput::new("chinachu", tempfile.clone()),
    );
    let mut out = Vec::new();
    plugin.write_values(&mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<(&str, &str)> = text
        .lines()
        .map(|l| {
            let mut parts = l.split('\t');
            (parts.next().unwrap(), parts.next().unwrap())
        })
        .collect();

    assert_eq!(lines.len(), 9);
    assert!(lines.contains(&("chinachu.connected_count.ConnectedCount", "1")));
    assert!(lines.contains(&("chinachu.feature.Filer", "1")));
    assert!(lines.contains(&("chinachu.recorded.RecordedCount", "2")));
    assert!(lines.contains(&("chinachu.rules.RulesCount", "2")));
    assert!(lines.contains(&("chinachu.reserves.ReservesCount", "1")));

    // State is rewritten after every successful poll.
    let raw = std::fs::read_to_string(&tempfile).unwrap();
    let state: Value = serde_json::from_str(&raw).unwrap();
    let epoch: i64 = text.lines().next().unwrap().rsplit('\t').next().unwrap().parse().unwrap();
    assert_eq!(state["_lastTime"], json!(epoch));
    assert_eq!(state["recorded.RecordedCount"], json!(2));
    assert_eq!(state["connected_count.ConnectedCount"], json!(1));
}

#[tokio::test]
async fn test_plugin_overwrites_stale_state() {
    let server = MockServer::start().await;
    mount_all(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let tempfile = dir.path().join("state");
    std::fs::write(&tempfile, "not json").unwrap();

    let plugin = Plugin::new(
        fetcher(&server, EndpointSet::status_only()),
        PluginOutput::new("chinachu", tempfile.clone()),
    );
    let mut out = Vec::new();
    plugin.write_values(&mut out).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 5);
    let state = Snapshot::load(&tempfile).unwrap().unwrap();
    assert_eq!(state.values.get("feature.Filer"), Some(&1));
    assert_eq!(state.values.get("recorded.RecordedCount"), None);
}

#[tokio::test]
async fn test_plugin_writes_nothing_on_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        "status",
        ResponseTemplate::new(200).set_body_string("{feature: [],}"),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let tempfile = dir.path().join("state");

    let plugin = Plugin::new(
        fetcher(&server, EndpointSet::status_only()),
        PluginOutput::new("chinachu", tempfile.clone()),
    );
    let mut out = Vec::new();
    let result = plugin.write_values(&mut out).await;

    assert!(result.is_err());
    assert!(out.is_empty());
    assert!(!tempfile.exists());
}

#[test]
fn test_plugin_definitions_follow_endpoint_set() {
    let client = ChinachuClient::new("localhost:10772", &TransportConfig::default()).unwrap();
    for (set, expected) in [
        (EndpointSet::status_only(), 2),
        (EndpointSet::with_recorded(), 3),
        (EndpointSet::all(), 6),
    ] {
        let plugin = Plugin::new(
            StatusFetcher::new(client.clone(), set),
            PluginOutput::new("chinachu", std::env::temp_dir().join("unused")),
        );
        assert_eq!(plugin.graph_definitions().len(), expected);

        let mut out = Vec::new();
        plugin.write_definitions(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let json: Value = serde_json::from_str(text.lines().nth(1).unwrap()).unwrap();
        assert_eq!(json["graphs"].as_object().unwrap().len(), expected);
    }
}
