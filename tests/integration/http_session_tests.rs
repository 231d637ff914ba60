//! Integration tests for the plain-HTTP rendering session
//!
//! These tests use wiremock to create mock HTTP servers and run the
//! session, and a full crawl, against them.

use realty_sweep::config::{Config, OutputFormat, RenderConfig, RenderEngine};
use realty_sweep::crawler::run_crawl;
use realty_sweep::render::{HttpSession, RenderSession};
use realty_sweep::{ListingRecord, RenderError, Termination};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let config = RenderConfig {
        user_agent: "RealtySweepTest/1.0".to_string(),
        ..RenderConfig::default()
    };

    Mock::given(method("GET"))
        .and(path("/listing"))
        .and(header("user-agent", "RealtySweepTest/1.0"))
        .respond_with(html("<h1>ok</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = HttpSession::new(&config).expect("Failed to build session");
    let url = format!("{}/listing", mock_server.uri());

    session.load_url(&url).await.expect("Load failed");
    session.wait_for_load().await.expect("Wait failed");
    session.scroll_by(1000).await.expect("Scroll failed");

    assert_eq!(session.read_markup().await.expect("Read failed"), "<h1>ok</h1>");
    assert_eq!(session.current_url(), Some(url.as_str()));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut session = HttpSession::new(&RenderConfig::default()).expect("Failed to build session");
    let result = session
        .load_url(&format!("{}/gone", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(RenderError::Status { status: 404, .. })));
    assert!(matches!(
        session.read_markup().await,
        Err(RenderError::NothingLoaded)
    ));
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Results page with two listing tiles and no pagination
    Mock::given(method("GET"))
        .and(path("/residential/sale/wanaka"))
        .respond_with(html(
            r#"<html><body>
                <div data-test="tile"><a href="/1/residential/sale/1-a"><div class="listed-date">Listed</div></a></div>
                <div data-test="tile"><a href="/2/residential/sale/2-b"><div class="listed-date">Listed</div></a></div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1/residential/sale/1-a"))
        .respond_with(html(
            r#"<h1 data-test="listing-title">1 A Street</h1>
               <div data-test="capital-valuation"><h4>$800,000</h4></div>"#,
        ))
        .mount(&mock_server)
        .await;

    // Second listing is broken; the run carries on
    Mock::given(method("GET"))
        .and(path("/2/residential/sale/2-b"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("listings.jsonl");

    let mut config = Config::default();
    config.site.base_url = base_url.clone();
    config.run.location = "wanaka".to_string();
    config.run.min_delay = 0.0;
    config.run.max_delay = 0.0;
    config.scroll.pause_ms = 1;
    config.scroll.max_retries = 1;
    config.render.engine = RenderEngine::Http;
    config.output.format = OutputFormat::Jsonl;
    config.output.path = output.to_string_lossy().into_owned();

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.records_emitted, 1);
    assert_eq!(report.listings_failed, 1);

    let contents = std::fs::read_to_string(&output).expect("Failed to read output");
    let records: Vec<ListingRecord> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].listing_url, format!("{}/1/residential/sale/1-a", base_url));
    assert_eq!(records[0].property_address, "1 A Street");
    assert_eq!(records[0].capital_value, "$800,000");
    assert_eq!(records[0].agent_names, "");
}

#[tokio::test]
async fn test_unreachable_first_page_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.site.base_url = mock_server.uri();
    config.render.engine = RenderEngine::Http;
    config.output.path = dir
        .path()
        .join("listings.jsonl")
        .to_string_lossy()
        .into_owned();

    let report = run_crawl(config).await.expect("Crawl failed");

    assert!(matches!(report.termination, Termination::Aborted { page: 1, .. }));
    assert_eq!(report.records_emitted, 0);
}
