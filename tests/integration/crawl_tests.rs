//! Integration tests for the crawler
//!
//! These tests drive the coordinator against canned pages served by a
//! `ReplaySession`, with manual time so no test actually sleeps.

use realty_sweep::config::{Config, OutputFormat};
use realty_sweep::crawler::{Coordinator, Timing};
use realty_sweep::render::ReplaySession;
use realty_sweep::sink::{MemorySink, RecordSink, SqliteSink};
use realty_sweep::{CrawlPhase, Termination};
use std::time::Duration;
use tempfile::TempDir;

const SEARCH: &str =
    "https://www.realestate.co.nz/residential/sale/central-otago-lakes-district/queenstown";
const ORIGIN: &str = "https://www.realestate.co.nz";

fn page_url(page: u32) -> String {
    if page == 1 {
        SEARCH.to_string()
    } else {
        format!("{}?page={}", SEARCH, page)
    }
}

fn listing_url(id: &str) -> String {
    format!("{}/{}/residential/sale/{}-test-road", ORIGIN, id, id)
}

/// Creates a test configuration with fixed delays and a single idle retry
fn create_test_config(max_pages: u32) -> Config {
    let mut config = Config::default();
    config.run.max_pages = max_pages;
    config.run.min_delay = 2.0;
    config.run.max_delay = 2.0;
    config.scroll.max_retries = 1;
    config.scroll.pause_ms = 500;
    config
}

/// Results page with one tile per listing id and pagination up to `last_page`
fn results_page(ids: &[&str], last_page: u32) -> String {
    let tiles: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div data-test="tile">
                    <a href="/agents/{id}"><img src="agent.png"></a>
                    <a href="/{id}/residential/sale/{id}-test-road"><div class="listed-date">Listed today</div><span>{id}</span></a>
                </div>"#
            )
        })
        .collect();

    let pagination: String = (1..=last_page)
        .map(|n| format!(r#"<a class="paginated-items__page-number"> {n} </a>"#))
        .collect();

    format!(
        r#"<html><body>
            <div class="tiles">{tiles}</div>
            <div data-test="paginated-items"><div>{pagination}<a class="paginated-items__page-number">Next</a></div></div>
        </body></html>"#
    )
}

fn detail_page(address: &str, bedrooms: &str) -> String {
    format!(
        r#"<html><body>
            <h1 data-test="listing-title">{address}</h1>
            <div data-test="features-icons">
                <div class="flex items-center"><svg><title>Property type</title></svg><span>House</span></div>
                <div class="flex items-center"><svg><title>Bedroom</title></svg><span>{bedrooms}</span></div>
            </div>
            <div class="property-agents"><h3>Ann Smith</h3><h3>Bo Li</h3></div>
        </body></html>"#
    )
}

fn with_listings(mut session: ReplaySession, ids: &[&str]) -> ReplaySession {
    for id in ids {
        session = session.with_page(listing_url(id), detail_page(&format!("{} Test Road", id), "3"));
    }
    session
}

fn coordinator(
    config: Config,
    session: ReplaySession,
    sink: MemorySink,
) -> (
    Coordinator<ReplaySession, MemorySink>,
    std::sync::Arc<realty_sweep::crawler::timing::ManualSleeper>,
) {
    let (timing, _clock, sleeper) = Timing::manual();
    let coordinator = Coordinator::new(config, session, sink)
        .expect("Failed to create coordinator")
        .with_timing(timing)
        .with_seed(42);
    (coordinator, sleeper)
}

/// Sleeps other than the scroll pause
fn listing_delays(sleeps: &[Duration]) -> Vec<Duration> {
    sleeps
        .iter()
        .copied()
        .filter(|d| *d != Duration::from_millis(500))
        .collect()
}

#[tokio::test]
async fn test_two_listings_emitted() {
    let session = with_listings(
        ReplaySession::new().with_page(page_url(1), results_page(&["11", "22"], 1)),
        &["11", "22"],
    );
    let (mut coordinator, sleeper) = coordinator(create_test_config(1), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.records_emitted, 2);
    assert_eq!(report.listings_failed, 0);
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.total_pages, 1);

    let (session, sink) = coordinator.into_parts();
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].listing_url, listing_url("11"));
    assert_eq!(records[0].property_address, "11 Test Road");
    assert_eq!(records[0].agent_names, "Ann Smith & Bo Li");
    assert_eq!(records[0].property_type, "House");
    assert_eq!(records[0].bedrooms, "3");
    assert_eq!(records[0].capital_value, "");

    assert_eq!(
        session.visited(),
        &[page_url(1), listing_url("11"), listing_url("22")]
    );
    assert!(session.is_closed());
    assert_eq!(listing_delays(&sleeper.sleeps()).len(), 2);
}

#[tokio::test]
async fn test_failed_listing_is_skipped() {
    let session = with_listings(
        ReplaySession::new()
            .with_page(page_url(1), results_page(&["11", "22"], 1))
            .with_failing_url(listing_url("11")),
        &["22"],
    );
    let (mut coordinator, sleeper) = coordinator(create_test_config(3), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.records_emitted, 1);
    assert_eq!(report.listings_failed, 1);
    assert_eq!(coordinator.sink().records()[0].listing_url, listing_url("22"));

    // No delay after the failed listing
    assert_eq!(listing_delays(&sleeper.sleeps()), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_sink_failure_is_skipped() {
    let session = with_listings(
        ReplaySession::new().with_page(page_url(1), results_page(&["11", "22"], 1)),
        &["11", "22"],
    );
    let sink = MemorySink::new().rejecting(listing_url("22"));
    let (mut coordinator, _sleeper) = coordinator(create_test_config(3), session, sink);

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.records_emitted, 1);
    assert_eq!(report.listings_failed, 1);
    assert!(report.termination.is_completed());
}

#[tokio::test]
async fn test_page_failure_keeps_earlier_records() {
    let session = with_listings(
        ReplaySession::new()
            .with_page(page_url(1), results_page(&["11", "22"], 3))
            .with_failing_url(page_url(2)),
        &["11", "22"],
    );
    let (mut coordinator, _sleeper) = coordinator(create_test_config(3), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    match &report.termination {
        Termination::Aborted { page, reason } => {
            assert_eq!(*page, 2);
            assert!(reason.contains("503"), "unexpected reason: {}", reason);
        }
        other => panic!("expected an aborted run, got {:?}", other),
    }
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.total_pages, 3);
    assert_eq!(coordinator.state().phase(), CrawlPhase::Done);

    let (session, sink) = coordinator.into_parts();
    assert_eq!(sink.records().len(), 2);
    assert_eq!(sink.flushes(), 1);
    assert!(!session.visited().contains(&page_url(3)));
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_total_pages_clamped_to_max_pages() {
    let session = with_listings(
        ReplaySession::new()
            .with_page(page_url(1), results_page(&["11"], 10))
            .with_page(page_url(2), results_page(&["22"], 10)),
        &["11", "22"],
    );
    let (mut coordinator, _sleeper) = coordinator(create_test_config(2), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.total_pages, 2);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.records_emitted, 2);

    let (session, _sink) = coordinator.into_parts();
    assert!(session.visited().contains(&page_url(2)));
    assert!(!session.visited().contains(&page_url(3)));
}

#[tokio::test]
async fn test_page_bound_read_from_first_page_only() {
    // Page 2 advertises more pages than page 1; the bound stays at 2
    let session = with_listings(
        ReplaySession::new()
            .with_page(page_url(1), results_page(&["11"], 2))
            .with_page(page_url(2), results_page(&["22"], 3))
            .with_page(page_url(3), results_page(&["33"], 3)),
        &["11", "22", "33"],
    );
    let (mut coordinator, _sleeper) = coordinator(create_test_config(5), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.total_pages, 2);
    assert_eq!(report.pages_visited, 2);
    assert_eq!(coordinator.state().total_pages(), Some(2));
}

#[tokio::test]
async fn test_lazily_loaded_tiles_are_discovered() {
    let session = with_listings(
        ReplaySession::new().with_lazy_page(
            page_url(1),
            vec![
                results_page(&["11"], 1),
                results_page(&["11", "22"], 1),
                results_page(&["11", "22", "33"], 1),
            ],
        ),
        &["11", "22", "33"],
    );
    let (mut coordinator, _sleeper) = coordinator(create_test_config(1), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.records_emitted, 3);
}

#[tokio::test]
async fn test_duplicate_tiles_visited_once() {
    let session = with_listings(
        ReplaySession::new().with_page(page_url(1), results_page(&["11", "11", "22"], 1)),
        &["11", "22"],
    );
    let (mut coordinator, _sleeper) = coordinator(create_test_config(1), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.records_emitted, 2);
    let (session, _sink) = coordinator.into_parts();
    let visits = session
        .visited()
        .iter()
        .filter(|url| **url == listing_url("11"))
        .count();
    assert_eq!(visits, 1);
}

#[tokio::test]
async fn test_delays_stay_within_bounds() {
    let ids = ["11", "22", "33", "44", "55"];
    let session = with_listings(
        ReplaySession::new().with_page(page_url(1), results_page(&ids, 1)),
        &ids,
    );
    let mut config = create_test_config(1);
    config.run.min_delay = 1.5;
    config.run.max_delay = 4.0;
    let (mut coordinator, sleeper) = coordinator(config, session, MemorySink::new());

    coordinator.run().await.expect("Crawl failed");

    let delays = listing_delays(&sleeper.sleeps());
    assert_eq!(delays.len(), ids.len());
    for delay in delays {
        assert!(
            delay >= Duration::from_secs_f64(1.5) && delay <= Duration::from_secs_f64(4.0),
            "delay out of bounds: {:?}",
            delay
        );
    }
}

#[tokio::test]
async fn test_empty_results_page_completes() {
    let session = ReplaySession::new().with_page(page_url(1), "<html><body></body></html>");
    let (mut coordinator, sleeper) = coordinator(create_test_config(3), session, MemorySink::new());

    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.termination, Termination::Completed);
    assert_eq!(report.total_pages, 1);
    assert_eq!(report.records_emitted, 0);
    assert!(listing_delays(&sleeper.sleeps()).is_empty());
}

#[tokio::test]
async fn test_crawl_into_sqlite_sink() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("listings.db");

    let session = with_listings(
        ReplaySession::new().with_page(page_url(1), results_page(&["11", "22"], 1)),
        &["11", "22"],
    );
    let mut config = create_test_config(1);
    config.output.format = OutputFormat::Sqlite;
    config.output.path = db_path.to_string_lossy().into_owned();

    let sink = SqliteSink::open(&db_path).expect("Failed to open database");
    let (timing, _clock, _sleeper) = Timing::manual();
    let mut coordinator = Coordinator::new(config, session, sink)
        .expect("Failed to create coordinator")
        .with_timing(timing);

    let report = coordinator.run().await.expect("Crawl failed");
    assert_eq!(report.records_emitted, 2);

    let (_session, sink) = coordinator.into_parts();
    assert_eq!(sink.appended(), 2);
    assert_eq!(
        sink.listing_urls().expect("Failed to query listings"),
        vec![listing_url("11"), listing_url("22")]
    );
}
