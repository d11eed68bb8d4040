//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a mock catalog listing and run the
//! full crawl cycle end-to-end with the HTTP renderer.

use catalog_snapshot::catalog::ModelFilter;
use catalog_snapshot::config::{Config, RendererEngine};
use catalog_snapshot::crawler::{crawl, Coordinator, CrawlTarget};
use catalog_snapshot::output::{load_snapshot, save_snapshot};
use catalog_snapshot::renderer::HttpRenderer;
use catalog_snapshot::StopReason;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server_uri: &str, max_pages: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.page_timeout_ms = 2_000;
    config.crawler.inter_page_delay_seconds = 0.0;
    config.source.base_url = format!("{}/search", server_uri);
    config.source.origin = server_uri.to_string();
    config.renderer.engine = RendererEngine::Http;
    config.renderer.user_agent = "IntegrationBot/1.0".to_string();
    config
}

fn card(name: &str, capabilities: &[&str], sizes: &[&str]) -> String {
    let capabilities: String = capabilities
        .iter()
        .map(|c| format!("<span x-test-capability>{}</span>", c))
        .collect();
    let sizes: String = sizes
        .iter()
        .map(|s| format!("<span x-test-size>{}</span>", s))
        .collect();
    format!(
        r#"<li><a href="/library/{name}"><div><h2>{name}</h2><p>The {name} model</p></div><div>{capabilities}{sizes}</div></a></li>"#,
    )
}

fn listing(items: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body><main><ul role="list">{}</ul></main></body></html>"#,
        items.concat()
    )
}

fn sentinel_listing() -> String {
    listing(&["<li><p>No models found</p></li>".to_string()])
}

fn full_listing(page: u32, count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| card(&format!("p{}-m{}", page, i), &["tools"], &["7b"]))
        .collect();
    listing(&items)
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn search_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == "/search")
        .count()
}

#[tokio::test]
async fn test_crawl_stops_at_sentinel_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        1,
        listing(&[
            card("llama3", &["tools"], &["8b", "70b"]),
            card("qwen3", &["tools", "thinking"], &["4b"]),
        ]),
    )
    .await;
    mount_page(&mock_server, 2, sentinel_listing()).await;

    let config = create_test_config(&base_url, 20);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::SentinelEmpty);
    assert_eq!(outcome.pages_attempted, 2);
    assert_eq!(outcome.dataset.total_pages, 1);
    assert_eq!(outcome.dataset.total_models, 2);

    let first = &outcome.dataset.models[0];
    assert_eq!(first.name.as_deref(), Some("llama3"));
    assert_eq!(first.description.as_deref(), Some("The llama3 model"));
    assert_eq!(first.capabilities, vec!["tools"]);
    assert_eq!(first.sizes, vec!["8b", "70b"]);
    assert_eq!(
        first.url.as_deref(),
        Some(format!("{}/library/llama3", base_url).as_str())
    );

    let second = &outcome.dataset.models[1];
    assert_eq!(second.capabilities, vec!["tools", "thinking"]);
}

#[tokio::test]
async fn test_crawl_respects_page_cap() {
    let mock_server = MockServer::start().await;

    for page in 1..=5 {
        mount_page(&mock_server, page, full_listing(page, 5)).await;
    }

    let config = create_test_config(&mock_server.uri(), 3);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::PageCap);
    assert_eq!(outcome.dataset.total_pages, 3);
    assert_eq!(outcome.dataset.total_models, 15);
    assert_eq!(search_requests(&mock_server).await, 3);

    let names: Vec<&str> = outcome
        .dataset
        .models
        .iter()
        .filter_map(|m| m.name.as_deref())
        .collect();
    assert_eq!(names.first(), Some(&"p1-m0"));
    assert_eq!(names.last(), Some(&"p3-m4"));
}

#[tokio::test]
async fn test_server_error_on_first_page_yields_empty_snapshot() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 20);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::FetchError);
    assert_eq!(outcome.dataset.total_pages, 0);
    assert_eq!(outcome.dataset.total_models, 0);

    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = temp_dir.path().join("data").join("models.json");
    save_snapshot(&outcome.dataset, &snapshot_path).expect("Failed to write snapshot");

    let loaded = load_snapshot(&snapshot_path).expect("Failed to read snapshot");
    assert_eq!(loaded.total_pages, 0);
    assert_eq!(loaded.total_models, 0);
    assert!(loaded.models.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_mid_crawl_keeps_earlier_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, full_listing(1, 4)).await;
    mount_page(&mock_server, 2, full_listing(2, 4)).await;
    // Page 3 is not mounted; wiremock answers 404

    let config = create_test_config(&mock_server.uri(), 20);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::FetchError);
    assert_eq!(outcome.pages_attempted, 3);
    assert_eq!(outcome.dataset.total_pages, 2);
    assert_eq!(outcome.dataset.total_models, 8);
}

#[tokio::test]
async fn test_page_without_listing_container_ends_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, full_listing(1, 2)).await;
    mount_page(
        &mock_server,
        2,
        "<html><body><p>Maintenance</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 20);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::FetchError);
    assert_eq!(outcome.dataset.total_pages, 1);
    assert_eq!(outcome.dataset.total_models, 2);
}

#[tokio::test]
async fn test_page_of_invalid_records_ends_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, 1, full_listing(1, 3)).await;
    mount_page(
        &mock_server,
        2,
        listing(&[card("draft-a", &["tools"], &[]), card("draft-b", &[], &[])]),
    )
    .await;
    mount_page(&mock_server, 3, full_listing(3, 3)).await;

    let config = create_test_config(&mock_server.uri(), 20);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::NoValidRecords);
    assert_eq!(outcome.dataset.total_pages, 1);
    assert_eq!(outcome.dataset.total_models, 3);
    assert_eq!(search_requests(&mock_server).await, 2);
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .and(header("user-agent", "IntegrationBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_listing(1, 1)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let outcome = crawl(&config).await.expect("Crawl failed");

    assert_eq!(outcome.stop_reason, StopReason::PageCap);
    assert_eq!(outcome.dataset.total_models, 1);
}

#[tokio::test]
async fn test_coordinator_with_explicit_http_renderer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "vision"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[card(
            "llava",
            &["vision"],
            &["7b", "13b"],
        )])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "vision"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&[])))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), 20);
    config.source.base_url = format!("{}/search?q=vision", mock_server.uri());

    let target = CrawlTarget::from_config(&config).expect("Invalid target");
    let renderer = HttpRenderer::new(&config.renderer).expect("Failed to build renderer");
    let coordinator = Coordinator::new(renderer, target, config.crawler.clone());

    let outcome = coordinator.run().await;

    // An empty list container is found but has no items
    assert_eq!(outcome.stop_reason, StopReason::EmptyPage);
    assert_eq!(outcome.dataset.total_pages, 1);
    assert_eq!(outcome.dataset.models[0].capabilities, vec!["vision"]);
    assert_eq!(outcome.dataset.models[0].sizes, vec!["7b", "13b"]);
}

#[tokio::test]
async fn test_saved_snapshot_can_be_queried() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        listing(&[
            card("llama3", &["tools"], &["8b", "70b"]),
            card("llava", &["vision"], &["7b"]),
            card("qwen3", &["tools", "thinking"], &["8b"]),
        ]),
    )
    .await;
    mount_page(&mock_server, 2, sentinel_listing()).await;

    let config = create_test_config(&mock_server.uri(), 20);
    let outcome = crawl(&config).await.expect("Crawl failed");
    assert!(outcome.teardown_error.is_none());

    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = temp_dir.path().join("models.json");
    save_snapshot(&outcome.dataset, &snapshot_path).expect("Failed to write snapshot");
    let dataset = load_snapshot(&snapshot_path).expect("Failed to read snapshot");

    let filter = ModelFilter {
        capabilities: vec!["tools".to_string()],
        sizes: vec!["8b".to_string()],
        ..ModelFilter::default()
    };
    let result = dataset.filter(&filter, None, 0);
    let names: Vec<&str> = result.models.iter().filter_map(|m| m.name.as_deref()).collect();
    assert_eq!(names, vec!["llama3", "qwen3"]);

    assert_eq!(dataset.unique_capabilities(), vec!["thinking", "tools", "vision"]);
    assert_eq!(dataset.unique_sizes(), vec!["70b", "7b", "8b"]);
    assert_eq!(
        dataset.find_by_name("llava").and_then(|m| m.url.clone()),
        Some(format!("{}/library/llava", mock_server.uri()))
    );
}
