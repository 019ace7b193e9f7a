//! Poller, metrics sink and web router wired together against a mock modem

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{MockModem, ModemBehaviour};
use surfboard_exporter::{
    ingestor::Poller,
    metrics::ExporterMetrics,
    web::{AppState, WebServer},
};

async fn exporter(modem: &MockModem, evict_stale_series: bool) -> (Poller, TestServer) {
    let metrics = ExporterMetrics::new(evict_stale_series).unwrap();
    let poller = Poller::new(
        Box::new(modem.client()),
        Arc::new(metrics.clone()),
        Duration::from_secs(10),
    );
    let server = TestServer::new(WebServer::create_router(AppState { metrics })).unwrap();
    (poller, server)
}

#[tokio::test]
async fn test_health_endpoint() {
    let modem = MockModem::start(ModemBehaviour::default()).await;
    let (_, server) = exporter(&modem, false).await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn test_metrics_endpoint_renders_channel_gauges() {
    let modem = MockModem::start(ModemBehaviour::default()).await;
    let (poller, server) = exporter(&modem, false).await;

    poller.run_cycle().await.unwrap();

    let response = server.get("/metrics").await;
    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = response.text();
    assert!(body.contains(
        r#"arris_surfboard_upstream_power{channel="5",channel_id="41",us_channel_type="OFDM Upstream"} 36.5"#
    ));
    assert!(body.contains(r#"arris_surfboard_downstream_power{channel_id="160",modulation="Other"} 0"#));
    for name in [
        "arris_surfboard_downstream_snr{",
        "arris_surfboard_downstream_corrected{",
        "arris_surfboard_downstream_uncorrectables{",
    ] {
        assert_eq!(body.matches(name).count(), 34, "{name}");
    }
    assert_eq!(body.matches("arris_surfboard_upstream_power{").count(), 5);
    assert!(body.contains("arris_surfboard_scrape_success 1"));
}

#[tokio::test]
async fn test_failed_poll_is_visible_on_metrics_endpoint() {
    let modem = MockModem::start(ModemBehaviour::default()).await;
    let (poller, server) = exporter(&modem, false).await;

    poller.run_cycle().await.unwrap();
    modem.set_login_status(StatusCode::UNAUTHORIZED);
    assert!(poller.run_cycle().await.is_err());

    let body = server.get("/metrics").await.text();
    assert!(body.contains("arris_surfboard_scrape_success 0"));
    assert!(body.contains("arris_surfboard_scrape_failures_total 1"));
    // Series from the last good poll remain
    assert_eq!(body.matches("arris_surfboard_upstream_power{").count(), 5);
}

fn without_channel_160(page: &str) -> String {
    let start = page.find("<td>160</td>").expect("fixture has channel 160");
    let row_start = page[..start].rfind("<tr").unwrap();
    let row_end = start + page[start..].find("</tr>").unwrap() + "</tr>".len();
    format!("{}{}", &page[..row_start], &page[row_end..])
}

#[tokio::test]
async fn test_disappeared_channel_persists_by_default() {
    let modem = MockModem::start(ModemBehaviour::default()).await;
    let (poller, server) = exporter(&modem, false).await;

    poller.run_cycle().await.unwrap();
    modem.set_status_body(without_channel_160(&common::fixture()));
    let snapshot = poller.run_cycle().await.unwrap();
    assert_eq!(snapshot.downstream.len(), 33);

    let body = server.get("/metrics").await.text();
    assert!(body.contains(r#"channel_id="160""#));
}

#[tokio::test]
async fn test_disappeared_channel_is_evicted_when_enabled() {
    let modem = MockModem::start(ModemBehaviour::default()).await;
    let (poller, server) = exporter(&modem, true).await;

    poller.run_cycle().await.unwrap();
    modem.set_status_body(without_channel_160(&common::fixture()));
    poller.run_cycle().await.unwrap();

    let body = server.get("/metrics").await.text();
    assert!(!body.contains(r#"channel_id="160""#));
    assert_eq!(body.matches("arris_surfboard_downstream_power{").count(), 33);
}
