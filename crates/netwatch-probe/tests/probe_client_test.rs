#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `ProbeClient` using wiremock.

use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netwatch_probe::{Error, ProbeClient, SpeedTestTarget};

// ── Helpers ─────────────────────────────────────────────────────────

/// Nothing listens on port 1, so connections are refused immediately.
const UNREACHABLE: &str = "http://127.0.0.1:1/unreachable";

fn url(server: &MockServer, suffix: &str) -> Url {
    Url::parse(&format!("{}{suffix}", server.uri())).unwrap()
}

fn client(server: &MockServer, endpoints: Vec<Url>) -> ProbeClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    ProbeClient::with_client(
        http,
        endpoints,
        SpeedTestTarget {
            latency_url: url(server, "/ping"),
            download_url: url(server, "/payload"),
            timeout: Duration::from_secs(2),
        },
    )
}

async fn mount_head(server: &MockServer, p: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

// ── Reachability ────────────────────────────────────────────────────

#[tokio::test]
async fn test_all_endpoints_reachable() {
    let server = MockServer::start().await;
    mount_head(&server, "/a", 200).await;
    mount_head(&server, "/b", 204).await;
    mount_head(&server, "/c", 200).await;

    let probe = client(
        &server,
        vec![url(&server, "/a"), url(&server, "/b"), url(&server, "/c")],
    );
    let report = probe.check_reachability().await.unwrap();

    assert!(report.any_success);
    assert_eq!(report.successes, 3);
    assert_eq!(report.reliability_pct, 100.0);
    assert_eq!(report.packet_loss_pct, 0.0);
    assert!(report.latency_ms >= 0.0);
}

#[tokio::test]
async fn test_error_status_still_counts_as_reachable() {
    let server = MockServer::start().await;
    mount_head(&server, "/forbidden", 403).await;
    // No mock for /missing: wiremock answers 404, which is still a response.

    let probe = client(
        &server,
        vec![url(&server, "/forbidden"), url(&server, "/missing")],
    );
    let report = probe.check_reachability().await.unwrap();

    assert_eq!(report.successes, 2);
    assert_eq!(report.reliability_pct, 100.0);
}

#[tokio::test]
async fn test_partial_failure_is_counted_not_raised() {
    let server = MockServer::start().await;
    mount_head(&server, "/a", 200).await;
    mount_head(&server, "/b", 200).await;

    let probe = client(
        &server,
        vec![
            url(&server, "/a"),
            url(&server, "/b"),
            Url::parse(UNREACHABLE).unwrap(),
            Url::parse("http://127.0.0.1:1/other").unwrap(),
        ],
    );
    let report = probe.check_reachability().await.unwrap();

    assert!(report.any_success);
    assert_eq!(report.total, 4);
    assert_eq!(report.reliability_pct, 50.0);
    assert_eq!(report.packet_loss_pct, 50.0);
}

#[tokio::test]
async fn test_total_failure_reports_no_success() {
    let server = MockServer::start().await;
    let probe = client(
        &server,
        vec![
            Url::parse(UNREACHABLE).unwrap(),
            Url::parse("http://127.0.0.1:1/b").unwrap(),
            Url::parse("http://127.0.0.1:1/c").unwrap(),
        ],
    );
    let report = probe.check_reachability().await.unwrap();

    assert!(!report.any_success);
    assert_eq!(report.reliability_pct, 0.0);
    assert_eq!(report.packet_loss_pct, 100.0);
}

#[tokio::test]
async fn test_slow_endpoint_times_out_as_loss() {
    let server = MockServer::start().await;
    mount_head(&server, "/fast", 200).await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let probe = client(&server, vec![url(&server, "/fast"), url(&server, "/slow")]);
    let report = probe.check_reachability().await.unwrap();

    assert_eq!(report.successes, 1);
    assert_eq!(report.packet_loss_pct, 50.0);
    // Latency is measured to the first success, not the straggler.
    assert!(report.latency_ms < 2000.0);
}

#[tokio::test]
async fn test_overlapping_rounds_run_once() {
    let server = MockServer::start().await;
    for p in ["/a", "/b", "/c"] {
        Mock::given(method("HEAD"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;
    }

    let probe = client(
        &server,
        vec![url(&server, "/a"), url(&server, "/b"), url(&server, "/c")],
    );
    let (first, second) = tokio::join!(probe.check_reachability(), probe.check_reachability());

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert!(!probe.is_probing());
}

// ── Speed test ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_speed_test_measures_payload() {
    let server = MockServer::start().await;
    mount_head(&server, "/ping", 200).await;
    Mock::given(method("GET"))
        .and(path("/payload"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100_000]))
        .mount(&server)
        .await;

    let probe = client(&server, vec![url(&server, "/ping")]);
    let sample = probe.speed_test().await.unwrap();

    assert_eq!(sample.bytes, 100_000);
    assert!(sample.download_mbps > 0.0);
    assert!(sample.download_mbps.is_finite());
    assert!(sample.latency_ms >= 0.0);
}

#[tokio::test]
async fn test_speed_test_rejects_error_status() {
    let server = MockServer::start().await;
    mount_head(&server, "/ping", 200).await;
    Mock::given(method("GET"))
        .and(path("/payload"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let probe = client(&server, vec![url(&server, "/ping")]);
    let result = probe.speed_test().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_speed_test_rejects_empty_payload() {
    let server = MockServer::start().await;
    mount_head(&server, "/ping", 200).await;
    Mock::given(method("GET"))
        .and(path("/payload"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let probe = client(&server, vec![url(&server, "/ping")]);
    let result = probe.speed_test().await;

    assert!(matches!(result, Err(Error::EmptyPayload)));
}

#[tokio::test]
async fn test_speed_test_unreachable_reference() {
    let server = MockServer::start().await;
    let http = reqwest::Client::new();
    let probe = ProbeClient::with_client(
        http,
        vec![url(&server, "/a")],
        SpeedTestTarget {
            latency_url: Url::parse(UNREACHABLE).unwrap(),
            download_url: url(&server, "/payload"),
            timeout: Duration::from_secs(1),
        },
    );

    let err = probe.speed_test().await.unwrap_err();
    assert!(err.is_transient(), "connection refused should be transient: {err:?}");
}
