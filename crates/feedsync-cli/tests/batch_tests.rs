//! Integration tests for the batch driver
//!
//! Sources are served by a wiremock HTTP server or read from fixtures;
//! deliveries go to an in-memory recording sink or a temp directory.

use async_trait::async_trait;
use feedsync_cli::jobs::JobList;
use feedsync_cli::loader::DefaultLoader;
use feedsync_cli::sink::{LocalDirSink, Sink};
use feedsync_cli::run_batch;
use feedsync_common::{FeedError, Result};
use feedsync_convert::TransformOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture")
}

/// Records deliveries; fails any destination listed in `reject`
#[derive(Default)]
struct RecordingSink {
    delivered: Mutex<Vec<(String, String)>>,
    reject: Vec<String>,
}

#[async_trait]
impl Sink for RecordingSink {
    async fn deliver(&self, content: &str, destination_name: &str) -> Result<()> {
        if self.reject.iter().any(|r| r == destination_name) {
            return Err(FeedError::delivery(format!("550 {}: permission denied", destination_name)));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((destination_name.to_string(), content.to_string()));
        Ok(())
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}

async fn feed_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/export/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("feed.xml")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/export/broken.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<Root><Urunler></Root>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/export/gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

// ============================================================================
// Success Path
// ============================================================================

#[tokio::test]
async fn test_http_and_local_sources_are_delivered() {
    let server = feed_server().await;
    let jobs = format!(
        "# supplier feeds\n{}/export/feed.xml katalog.xml\n{} yerel katalog.xml\n",
        server.uri(),
        fixture_path("feed.xml").display()
    );
    let list = JobList::parse(&jobs);
    let sink = RecordingSink::default();
    let loader = DefaultLoader::new().unwrap();

    let report = run_batch(&list, &loader, &sink, &TransformOptions::default()).await;

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.delivered, vec!["katalog.xml", "yerel katalog.xml"]);

    let delivered = sink.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 2);
    let (_, catalog) = &delivered[0];
    assert!(catalog.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
    assert!(catalog.contains("<id>501</id>"));
    assert!(catalog.contains("<productCode>CNT-501</productCode>"));
    assert!(catalog.contains("<category>Aksesuar &gt;&gt;&gt; Çanta</category>"));
    assert!(catalog.contains("<tax>0.2</tax>"));
    assert!(catalog.contains("<currency>TRY</currency>"));
    assert!(catalog.contains("<value1>Haki</value1>"));
    assert!(catalog.contains("<quantity>12</quantity>"));
    assert_eq!(delivered[0].1, delivered[1].1);
}

#[tokio::test]
async fn test_transform_options_reach_the_catalog() {
    let list = JobList::parse(&format!("{} out.xml", fixture_path("feed.xml").display()));
    let sink = RecordingSink::default();
    let options = TransformOptions {
        currency: "EUR".to_string(),
        color_label: "Renk".to_string(),
        size_label: "Beden".to_string(),
        ..TransformOptions::default()
    };

    let report = run_batch(&list, &DefaultLoader::new().unwrap(), &sink, &options).await;
    assert_eq!(report.delivered.len(), 1);

    let delivered = sink.delivered.lock().unwrap();
    let catalog = &delivered[0].1;
    assert!(catalog.contains("<currency>EUR</currency>"));
    assert!(catalog.contains("<name1>Renk</name1>"));
    assert!(catalog.contains("<name2>Beden</name2>"));
}

// ============================================================================
// Failure Isolation
// ============================================================================

#[tokio::test]
async fn test_failures_are_reported_and_batch_continues() {
    let server = feed_server().await;
    let jobs = format!(
        "{uri}/export/gone.xml gone.xml\n\
         /nonexistent/feed.xml missing.xml\n\
         {uri}/export/broken.xml broken.xml\n\
         {uri}/export/feed.xml denied.xml\n\
         {uri}/export/feed.xml\n\
         {uri}/export/feed.xml ok.xml\n",
        uri = server.uri()
    );
    let list = JobList::parse(&jobs);
    let sink = RecordingSink {
        reject: vec!["denied.xml".to_string()],
        ..RecordingSink::default()
    };

    let report = run_batch(
        &list,
        &DefaultLoader::new().unwrap(),
        &sink,
        &TransformOptions::default(),
    )
    .await;

    assert_eq!(report.delivered, vec!["ok.xml"]);
    assert_eq!(report.rejected, vec![5]);

    let kinds: Vec<(&str, &str)> = report
        .failures
        .iter()
        .map(|f| (f.destination.as_str(), f.kind.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("gone.xml", "fetch"),
            ("missing.xml", "not_found"),
            ("broken.xml", "parse"),
            ("denied.xml", "delivery"),
        ]
    );
    assert_eq!(report.failures[1].source, "/nonexistent/feed.xml");
    assert!(report.failures[0].message.contains("404"));

    assert_eq!(sink.delivered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_job_list() {
    let sink = RecordingSink::default();
    let report = run_batch(
        &JobList::parse("# nothing yet\n"),
        &DefaultLoader::new().unwrap(),
        &sink,
        &TransformOptions::default(),
    )
    .await;

    assert_eq!(report, Default::default());
}

// ============================================================================
// Local Directory Sink
// ============================================================================

#[tokio::test]
async fn test_batch_into_local_directory() {
    let out = tempfile::tempdir().unwrap();
    let list = JobList::parse(&format!("{} katalog.xml", fixture_path("feed.xml").display()));
    let sink = LocalDirSink::new(out.path());

    let report = run_batch(
        &list,
        &DefaultLoader::new().unwrap(),
        &sink,
        &TransformOptions::default(),
    )
    .await;

    assert!(report.is_clean());
    let written = std::fs::read_to_string(out.path().join("katalog.xml")).unwrap();
    assert!(written.contains("<products>"));
    assert!(written.contains("<image1>https://cdn.example.com/501/1.jpg</image1>"));
}
