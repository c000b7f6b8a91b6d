//! End-to-end fetches against in-process status pages.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use multistat_agent::app_state::AppState;
use multistat_agent::config;
use multistat_agent::fetch::{Endpoint, HttpFetcher, StatusSource};
use multistat_agent::poll::Orchestrator;
use multistat_core::error::{FetchError, Stage};
use multistat_core::MultistatError;

const STATUS_PATH: &str = "/server-status?auto";

const PAGE: &str = "localhost\nServerVersion: Apache/2.4.57\nTotal Accesses: 120\n\
Total kBytes: 64\nCPULoad: .25\nBusyWorkers: 2\nIdleWorkers: 8\nScoreboard: W_K_..\n";

async fn serve(router: Router) -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    port
}

fn status_page() -> Router {
    Router::new().route("/server-status", get(|| async { PAGE }))
}

fn failing_page() -> Router {
    Router::new().route(
        "/server-status",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    )
}

fn endpoint(port: u16) -> Endpoint {
    Endpoint::new("127.0.0.1", port, STATUS_PATH)
}

#[tokio::test]
async fn fetches_body_text() {
    let port = serve(status_page()).await;
    let fetcher = HttpFetcher::new().unwrap();

    let doc = fetcher.fetch(&endpoint(port)).await.unwrap();
    assert_eq!(doc.as_str(), PAGE);
}

#[tokio::test]
async fn non_200_is_a_fetch_error() {
    let port = serve(failing_page()).await;
    let fetcher = HttpFetcher::new().unwrap();

    let err = fetcher.fetch(&endpoint(port)).await.unwrap_err();
    assert!(matches!(err, FetchError::Status(500)), "{err}");

    let missing = fetcher
        .fetch(&Endpoint::new("127.0.0.1", port, "/nope"))
        .await
        .unwrap_err();
    assert!(matches!(missing, FetchError::Status(404)), "{missing}");
}

#[tokio::test]
async fn connection_refused_is_a_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&endpoint(port)).await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)), "{err}");
}

#[tokio::test]
async fn truncated_body_is_a_body_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = stream.read(&mut request).await;
        // advertises 100 bytes, sends 15, then closes
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nBusyWorkers: 3\n")
            .await
            .unwrap();
    });

    let fetcher = HttpFetcher::new().unwrap();
    let err = fetcher.fetch(&endpoint(port)).await.unwrap_err();
    assert!(matches!(err, FetchError::Body(_)), "{err}");
}

#[tokio::test]
async fn host_header_overrides_virtual_host() {
    let router = Router::new().route(
        "/server-status",
        get(|headers: HeaderMap| async move {
            let host = headers.get("host").and_then(|h| h.to_str().ok());
            let probe = headers.get("x-probe").and_then(|h| h.to_str().ok());
            if host == Some("status.example") && probe == Some("multistat") {
                (StatusCode::OK, PAGE)
            } else {
                (StatusCode::FORBIDDEN, "wrong vhost")
            }
        }),
    );
    let port = serve(router).await;
    let fetcher = HttpFetcher::new().unwrap();

    let plain = fetcher.fetch(&endpoint(port)).await.unwrap_err();
    assert!(matches!(plain, FetchError::Status(403)));

    let vhost = endpoint(port).with_headers(vec![
        "host:  status.example ".to_string(),
        "X-Probe: multistat".to_string(),
    ]);
    let doc = fetcher.fetch(&vhost).await.unwrap();
    assert_eq!(doc.as_str(), PAGE);
}

#[tokio::test]
async fn healthy_and_failing_port_fails_whole_cycle() {
    let good = serve(status_page()).await;
    let bad = serve(failing_page()).await;

    let orch = Orchestrator::new(Arc::new(HttpFetcher::new().unwrap()), "apache2");
    let err = orch
        .poll(&[endpoint(good), endpoint(bad)])
        .await
        .unwrap_err();

    let MultistatError::Port(e) = err else {
        panic!("expected port error, got {err}");
    };
    assert_eq!(e.port, bad);
    assert_eq!(e.stage(), Stage::Fetch);
}

#[tokio::test]
async fn values_output_end_to_end() {
    let a = serve(status_page()).await;
    let b = serve(status_page()).await;
    let tempfile = std::env::temp_dir().join(format!("multistat-e2e-{}-{a}", std::process::id()));
    let _ = std::fs::remove_file(&tempfile);

    let yaml = format!(
        "version: 1\ntarget:\n  ports: [{a}, {b}]\nplugin:\n  tempfile: {:?}\n",
        tempfile.display().to_string()
    );
    let cfg = config::load_from_str(&yaml).unwrap();
    let state = AppState::with_source(cfg, Arc::new(HttpFetcher::new().unwrap())).unwrap();

    let mut out = Vec::new();
    state.output_values(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    for port in [a, b] {
        assert!(text.contains(&format!("apache2.{port}.Workers.busy_workers\t2.000000\t")));
        assert!(text.contains(&format!("apache2.{port}.Cpu.cpu_load\t0.250000\t")));
        assert!(text.contains(&format!("apache2.{port}.Scoreboard.score-.\t2.000000\t")));
        // first cycle: no baseline for diffed counters
        assert!(!text.contains(&format!("apache2.{port}.Req.requests")));
        // published under a different name, never reported
        assert!(!text.contains(&format!("apache2.{port}.Scoreboard.score-W")));
    }
    assert!(tempfile.exists());
    let _ = std::fs::remove_file(&tempfile);
}

#[tokio::test]
async fn definitions_output() {
    let cfg = config::load_from_str("version: 1\ntarget:\n  ports: [80]\n").unwrap();
    let state = AppState::with_source(cfg, Arc::new(HttpFetcher::new().unwrap())).unwrap();

    let mut out = Vec::new();
    state.output_definitions(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("# mackerel-agent-plugin\n{\"graphs\":{"));
}
