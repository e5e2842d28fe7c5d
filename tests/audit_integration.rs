//! Integration tests running the real HTTP transport against a mock CDN.

use std::sync::Arc;

use icon_audit::{
    AuditConfig, AuditEngine, ErrorKind, FetchError, Fetcher, HttpFetcher, ImageSniffer,
    UrlTemplate,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::fixtures;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return Ok(());
        };
        mock_server
    }};
}

fn template_for(server: &MockServer) -> String {
    format!("{}/apps/icons/100/{{id}}/icon.png", server.uri())
}

fn icon_path(id: u32) -> String {
    format!("/apps/icons/100/{id}/icon.png")
}

async fn mount_icon(server: &MockServer, id: u32, status: u16, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(icon_path(id)))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(body))
        .expect(1)
        .mount(server)
        .await;
}

fn create_engine(
    template: &str,
    count: u32,
    concurrency: usize,
) -> Result<AuditEngine, Box<dyn std::error::Error>> {
    let config = AuditConfig::new(UrlTemplate::new(template)?, count, concurrency, "png")?;
    Ok(AuditEngine::new(
        config,
        Arc::new(HttpFetcher::new()?),
        Arc::new(ImageSniffer::default()),
    )?)
}

// ==================== Transport Tests ====================

#[tokio::test]
async fn test_http_fetcher_returns_status_and_body() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = require_mock_server!();
    mount_icon(&mock_server, 1, 200, fixtures::png()).await;

    let fetcher = HttpFetcher::new()?;
    let response = fetcher
        .fetch(&format!("{}{}", mock_server.uri(), icon_path(1)))
        .await?;

    assert_eq!(response.status, 200);
    assert_eq!(response.body, fixtures::png());
    Ok(())
}

#[tokio::test]
async fn test_http_fetcher_asks_server_to_close_connection()
-> Result<(), Box<dyn std::error::Error>> {
    let mock_server = require_mock_server!();
    Mock::given(method("GET"))
        .and(path(icon_path(7)))
        .and(header("connection", "close"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(fixtures::png()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new()?;
    let url = format!("{}{}", mock_server.uri(), icon_path(7));
    for _ in 0..2 {
        let response = fetcher.fetch(&url).await?;
        assert_eq!(response.status, 200, "request lacked Connection: close");
    }

    mock_server.verify().await;
    Ok(())
}

#[tokio::test]
async fn test_http_fetcher_non_success_is_not_an_error() -> Result<(), Box<dyn std::error::Error>>
{
    let mock_server = require_mock_server!();
    mount_icon(&mock_server, 2, 503, b"busy".to_vec()).await;

    let fetcher = HttpFetcher::new()?;
    let response = fetcher
        .fetch(&format!("{}{}", mock_server.uri(), icon_path(2)))
        .await?;

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    Ok(())
}

#[tokio::test]
async fn test_http_fetcher_connection_refused_is_transport_error()
-> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new()?;
    let result = fetcher.fetch("http://127.0.0.1:1/apps/icons/100/0/icon.png").await;
    assert!(matches!(result, Err(FetchError::Transport { .. })));
    Ok(())
}

// ==================== Engine Tests ====================

#[tokio::test]
async fn test_audit_against_mock_cdn_reports_anomalies() -> Result<(), Box<dyn std::error::Error>>
{
    let mock_server = require_mock_server!();
    mount_icon(&mock_server, 0, 200, fixtures::jpeg()).await;
    // id 1 is not mounted: wiremock answers 404
    mount_icon(&mock_server, 2, 200, fixtures::png()).await;
    mount_icon(&mock_server, 3, 200, b"<html>moved</html>".to_vec()).await;
    mount_icon(&mock_server, 4, 200, fixtures::gif()).await;
    mount_icon(&mock_server, 5, 500, Vec::new()).await;

    let template = template_for(&mock_server);
    let run = create_engine(&template, 6, 3)?.run().await?;

    let ids: Vec<u32> = run.report.records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 3, 4]);

    let records = run.report.records();
    assert_eq!(records[0].detected_format, "jpeg");
    assert_eq!(records[0].failure, None);
    assert_eq!(records[1].failure, Some(ErrorKind::DecodeFailed));
    assert_eq!(records[2].detected_format, "gif");
    assert_eq!(records[2].url, template.replace("{id}", "4"));

    assert_eq!(run.stats.skipped(), 2);
    assert_eq!(run.stats.matched(), 1);
    assert!(run.report.to_string().ends_with("total count = 3\n"));
    Ok(())
}

#[tokio::test]
async fn test_audit_requests_each_icon_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
    let mock_server = require_mock_server!();
    for id in 0..30 {
        mount_icon(&mock_server, id, 200, fixtures::png()).await;
    }

    let run = create_engine(&template_for(&mock_server), 30, 4)?
        .run()
        .await?;

    assert!(run.report.is_empty());
    assert_eq!(run.stats.matched(), 30);
    mock_server.verify().await;
    Ok(())
}

#[tokio::test]
async fn test_audit_unreachable_host_reports_transport_failures()
-> Result<(), Box<dyn std::error::Error>> {
    let run = create_engine("http://127.0.0.1:1/apps/icons/100/{id}/icon.png", 3, 2)?
        .run()
        .await?;

    assert_eq!(run.report.total_count(), 3);
    for (expected_id, record) in run.report.records().iter().enumerate() {
        assert_eq!(record.id as usize, expected_id);
        assert_eq!(record.failure, Some(ErrorKind::TransportFailed));
        assert!(record.to_string().contains(" | error: "));
    }
    Ok(())
}
