//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock results sites and run the full
//! seed → crawl → download cycle end-to-end into a temporary directory.

use ballot_harvest::config::{Config, CrawlerConfig, DownloadConfig, OutputConfig, SeederConfig};
use ballot_harvest::crawler::{Coordinator, HttpTransport};
use ballot_harvest::segment::Segmenter;
use ballot_harvest::HarvestError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_CSV: &[u8] = b"Division,Votes\nCanberra,84211\n";
const SENATE_CSV: &[u8] = b"State,Quota\nACT,95312\n";

/// Creates a test configuration crawling the mock server into `root`
fn create_test_config(base_url: &str, root: &Path) -> Config {
    Config {
        seeder: SeederConfig {
            pages: vec![format!("{}/", base_url)],
        },
        crawler: CrawlerConfig {
            max_depth: 4,
            throttle_interval: 3,
            ..CrawlerConfig::default()
        },
        download: DownloadConfig {
            max_file_size: 1_000,
            target_content_type: None,
        },
        output: OutputConfig {
            root: root.to_string_lossy().into_owned(),
        },
        ..Config::default()
    }
}

fn test_segmenter() -> Segmenter {
    Segmenter::from_counts("results 100\ncsv 10\nsenate 50\nhouse 80\n")
        .expect("Failed to build segmenter")
}

/// Mounts an HTML page
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts HEAD and GET for a downloadable file
async fn mount_file(server: &MockServer, route: &str, body: &'static [u8]) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", body.len().to_string().as_str())
                .set_body_bytes(body),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Mounts the top-level page with one 2022 House entry point
async fn mount_seed(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><body>
            <a href="/2022/index.htm">2022 — House of Representatives</a>
            <a href="/about.htm">About the results</a>
        </body></html>"#,
    )
    .await;
}

/// Every file under `root` with the given name
fn files_named(root: &Path, name: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.file_name().and_then(|n| n.to_str()) == Some(name) {
                found.push(path);
            }
        }
    }
    found
}

#[tokio::test]
async fn test_full_harvest_single_year() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body>
            <a href="results.csv">Results</a>
            <a href="tel:+61262717000">Download by phone</a>
            <a href="house/index.htm">House</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/2022/house/index.htm",
        r#"<html><body><a href="senate.csv">Download</a></body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/2022/results.csv", RESULTS_CSV).await;
    mount_file(&mock_server, "/2022/house/senate.csv", SENATE_CSV).await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let year_root = output.path().join("2022").join("houseofrepresentatives");

    let results = year_root.join("results").join("csv").join("results.csv");
    assert_eq!(std::fs::read(&results).expect("results.csv missing"), RESULTS_CSV);

    let senate = year_root.join("senate").join("csv").join("senate.csv");
    assert_eq!(std::fs::read(&senate).expect("senate.csv missing"), SENATE_CSV);

    let stats = coordinator.stats();
    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.files_saved, 2);
    assert_eq!(stats.branches_abandoned, 0);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body>
            <a href="results.csv">Results</a>
            <a href="results.csv">Results again</a>
            <a href="detail.htm">Detail</a>
            <a href="detail.htm">Detail again</a>
        </body></html>"#,
    )
    .await;

    // The detail page links back to its parent; the cycle must not refetch it
    Mock::given(method("GET"))
        .and(path("/2022/detail.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="index.htm">Back</a><a href="results.csv">Download</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/2022/results.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", RESULTS_CSV.len().to_string().as_str())
                .set_body_bytes(RESULTS_CSV),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2022/results.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RESULTS_CSV))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.stats().pages_visited, 2);
    assert_eq!(coordinator.stats().files_saved, 1);
    assert!(coordinator
        .registry()
        .urls
        .contains(&format!("{}/2022/index.htm", base_url)));
}

#[tokio::test]
async fn test_duplicate_filename_saved_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body>
            <a href="a/results.csv">House results</a>
            <a href="b/results.csv">Senate results</a>
        </body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/2022/a/results.csv", RESULTS_CSV).await;
    mount_file(&mock_server, "/2022/b/results.csv", SENATE_CSV).await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let saved = files_named(output.path(), "results.csv");
    assert_eq!(saved.len(), 1, "Expected exactly one results.csv, got {:?}", saved);
    assert_eq!(std::fs::read(&saved[0]).unwrap(), RESULTS_CSV);

    assert_eq!(coordinator.stats().files_saved, 1);
    assert_eq!(coordinator.stats().duplicate_filenames, 1);
}

#[tokio::test]
async fn test_followed_subtree_before_next_anchor() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body>
            <a href="sub.htm">Sub</a>
            <a href="a/results.csv">House results</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/2022/sub.htm",
        r#"<html><body><a href="b/results.csv">Senate results</a></body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/2022/a/results.csv", RESULTS_CSV).await;
    mount_file(&mock_server, "/2022/b/results.csv", SENATE_CSV).await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    // sub.htm is explored before the second anchor, so its file wins the name
    let saved = files_named(output.path(), "results.csv");
    assert_eq!(saved.len(), 1, "Expected exactly one results.csv, got {:?}", saved);
    assert_eq!(std::fs::read(&saved[0]).unwrap(), SENATE_CSV);

    assert_eq!(coordinator.stats().pages_visited, 2);
    assert_eq!(coordinator.stats().files_saved, 1);
    assert_eq!(coordinator.stats().duplicate_filenames, 1);
}

#[tokio::test]
async fn test_injected_transport_is_used() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");
    let agent = "results-mirror/2.1";

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", agent))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="/2022/index.htm">2022 Federal Election</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2022/index.htm"))
        .and(header("user-agent", agent))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><a href="results.csv">Results</a></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_file(&mock_server, "/2022/results.csv", RESULTS_CSV).await;

    let client = reqwest::Client::builder()
        .user_agent(agent)
        .build()
        .expect("Failed to build client");
    let transport = HttpTransport::with_client(client);

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::with_transport(config, test_segmenter(), transport);
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.stats().pages_visited, 1);
    assert_eq!(coordinator.stats().files_saved, 1);
    assert_eq!(coordinator.stats().branches_abandoned, 0);
}

#[tokio::test]
async fn test_oversized_file_not_downloaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="results.csv">Results</a></body></html>"#,
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/2022/results.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", RESULTS_CSV.len().to_string().as_str())
                .set_body_bytes(RESULTS_CSV),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2022/results.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RESULTS_CSV))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, output.path());
    config.download.max_file_size = 4;

    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert!(files_named(output.path(), "results.csv").is_empty());
    assert_eq!(coordinator.stats().files_skipped, 1);
    assert_eq!(coordinator.stats().files_saved, 0);
}

#[tokio::test]
async fn test_wrong_content_type_not_downloaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="results.csv">Results</a></body></html>"#,
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/2022/results.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2022/results.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(RESULTS_CSV))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, output.path());
    config.download.target_content_type = Some("text/csv".to_string());

    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert!(files_named(output.path(), "results.csv").is_empty());
    assert_eq!(coordinator.stats().files_skipped, 1);
}

#[tokio::test]
async fn test_content_disposition_names_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="export.csv">Export</a></body></html>"#,
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/2022/export.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", SENATE_CSV.len().to_string().as_str())
                .set_body_bytes(SENATE_CSV),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2022/export.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(SENATE_CSV)
                .insert_header("content-disposition", "attachment; filename=senate.csv"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let expected = output
        .path()
        .join("2022")
        .join("houseofrepresentatives")
        .join("senate")
        .join("csv")
        .join("senate.csv");
    assert_eq!(std::fs::read(&expected).expect("senate.csv missing"), SENATE_CSV);
    assert!(files_named(output.path(), "export.csv").is_empty());
}

#[tokio::test]
async fn test_max_depth_stops_descent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="deeper.htm">Download more</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/2022/deeper.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url, output.path());
    config.crawler.max_depth = 1;

    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.stats().pages_visited, 1);
}

#[tokio::test]
async fn test_follow_text_overrides_throttle() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_seed(&mock_server).await;
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="level1.htm">Divisions</a></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/2022/level1.htm",
        r#"<html><body>
            <a href="plain.htm">Polling places</a>
            <a href="labelled.htm">Download files</a>
        </body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/2022/plain.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2022/labelled.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // With an interval of 1 every level past the root is throttled
    let mut config = create_test_config(&base_url, output.path());
    config.crawler.throttle_interval = 1;

    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.stats().pages_visited, 3);
}

#[tokio::test]
async fn test_missing_page_abandons_branch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/2019/index.htm">2019 Federal Election</a>
            <a href="/2022/index.htm">2022 Federal Election</a>
        </body></html>"#,
    )
    .await;
    // 2019 is not mounted, so it answers 404
    mount_page(
        &mock_server,
        "/2022/index.htm",
        r#"<html><body><a href="results.csv">Results</a></body></html>"#,
    )
    .await;
    mount_file(&mock_server, "/2022/results.csv", RESULTS_CSV).await;

    let config = create_test_config(&base_url, output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.stats().branches_abandoned, 1);
    assert_eq!(coordinator.stats().files_saved, 1);
    assert_eq!(
        files_named(&output.path().join("2022").join("federalelection"), "results.csv").len(),
        1
    );
}

#[tokio::test]
async fn test_unreachable_host_is_fatal() {
    let output = TempDir::new().expect("Failed to create temp dir");

    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1", output.path());
    let mut coordinator = Coordinator::new(config, test_segmenter()).expect("Failed to create coordinator");

    let result = coordinator.run().await;
    assert!(matches!(result, Err(HarvestError::Fetch { .. })));
}
