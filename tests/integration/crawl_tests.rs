//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full extract-and-scan cycle end-to-end.

use email_census::config::HttpConfig;
use email_census::crawler::{
    count_page_occurrences, extract_links_or_empty, fetch_body, fetch_links, run_crawl,
    CancelFlag, ChannelObserver, Coordinator, CrawlObserver, FetchError,
};
use email_census::output::export_results;
use email_census::state::{CrawlEvent, CrawlSummary, ScanOutcome, ScanResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Address nothing listens on, for connection failures
const UNREACHABLE: &str = "http://127.0.0.1:1/unreachable";

fn test_coordinator() -> Coordinator {
    let config = HttpConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..HttpConfig::default()
    };
    Coordinator::new(&config).expect("Failed to build coordinator")
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

fn results_as_pairs(results: &[ScanResult]) -> Vec<(String, usize)> {
    results.iter().map(|r| (r.url.clone(), r.count())).collect()
}

#[tokio::test]
async fn test_seed_with_internal_and_external_link() {
    let seed_server = MockServer::start().await;
    let ext_server = MockServer::start().await;
    let seed = seed_server.uri();
    let ext = ext_server.uri();

    mount_page(
        &seed_server,
        "/",
        &format!(r#"<a href="/p1">x</a><a href="{}/p2">y</a>"#, ext),
    )
    .await;
    mount_page(
        &seed_server,
        "/p1",
        "Contact a@b.com or write to <b>a@b.com</b>",
    )
    .await;
    mount_page(&ext_server, "/p2", "No address here, not even A@B.COM").await;

    let client = test_coordinator().client().clone();
    let mut progress = Vec::new();
    let mut results = Vec::new();
    let mut done = 0;

    let summary = run_crawl(
        &client,
        &format!("{}/", seed),
        "a@b.com",
        |url| progress.push(url.to_string()),
        |url, count| results.push((url.to_string(), count)),
        || done += 1,
    )
    .await
    .expect("Crawl failed");

    let expected = vec![
        (format!("{}/p1", seed), 2),
        (format!("{}/p2", ext), 0),
    ];

    assert_eq!(results, expected);
    assert_eq!(
        progress,
        vec![format!("{}/p1", seed), format!("{}/p2", ext)]
    );
    assert_eq!(done, 1);

    assert_eq!(results_as_pairs(&summary.results), expected);
    assert_eq!(summary.results[0].outcome, ScanOutcome::Found(2));
    assert_eq!(summary.results[1].outcome, ScanOutcome::NotFound);
    assert!(summary.seed_error.is_none());
    assert!(summary.is_complete());
}

#[tokio::test]
async fn test_error_status_seed_still_yields_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"<h1>Not found</h1><a href="/x">x</a><a href="/y">y</a>"#),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/x", "a@b.com").await;
    mount_page(&mock_server, "/y", "nothing").await;

    let mut events: Vec<CrawlEvent> = Vec::new();
    let summary = test_coordinator()
        .run(
            &format!("{}/", base_url),
            "a@b.com",
            &mut events,
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    assert!(summary.seed_error.is_none());
    assert_eq!(summary.links_found, 2);
    assert_eq!(
        results_as_pairs(&summary.results),
        vec![(format!("{}/x", base_url), 1), (format!("{}/y", base_url), 0)]
    );
}

#[tokio::test]
async fn test_error_status_seed_with_empty_body_yields_no_links() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut events: Vec<CrawlEvent> = Vec::new();
    let summary = test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut events,
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    assert!(summary.results.is_empty());
    assert_eq!(summary.links_found, 0);
    assert!(summary.seed_error.is_none());
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CrawlEvent::Done(_)));
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_results() {
    let mut events: Vec<CrawlEvent> = Vec::new();
    let summary = test_coordinator()
        .run(UNREACHABLE, "a@b.com", &mut events, &CancelFlag::new())
        .await
        .expect("Crawl failed");

    assert!(summary.results.is_empty());
    assert!(summary.seed_error.is_some());
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CrawlEvent::Done(_)));
}

#[tokio::test]
async fn test_zero_anchors_finishes_immediately() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>No links at all</p>").await;

    let mut events: Vec<CrawlEvent> = Vec::new();
    let summary = test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut events,
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    assert!(summary.results.is_empty());
    assert!(summary.seed_error.is_none());
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CrawlEvent::Done(_)));

    // Only the seed page was requested
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

/// Counts requests as the server answers them
struct CountingResponder {
    served: Arc<AtomicUsize>,
    template: ResponseTemplate,
}

impl Respond for CountingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.served.fetch_add(1, Ordering::SeqCst);
        self.template.clone()
    }
}

/// Samples the served-request counter at every notification
struct OrderingObserver {
    served: Arc<AtomicUsize>,
    at_progress: Vec<(usize, usize)>,
    at_result: Vec<(usize, usize)>,
    done_calls: usize,
}

impl CrawlObserver for OrderingObserver {
    fn on_progress(&mut self, index: usize, _total: usize, _url: &str) {
        self.at_progress
            .push((index, self.served.load(Ordering::SeqCst)));
    }

    fn on_result(&mut self, index: usize, _result: &ScanResult) {
        self.at_result.push((index, self.served.load(Ordering::SeqCst)));
    }

    fn on_done(&mut self, _summary: &CrawlSummary) {
        self.done_calls += 1;
    }
}

#[tokio::test]
async fn test_notifications_interleave_with_requests() {
    let mock_server = MockServer::start().await;
    let served = Arc::new(AtomicUsize::new(0));

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(CountingResponder {
            served: served.clone(),
            template: html_page(r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#),
        })
        .mount(&mock_server)
        .await;

    for page in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(CountingResponder {
                served: served.clone(),
                template: html_page("a@b.com"),
            })
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut observer = OrderingObserver {
        served: served.clone(),
        at_progress: Vec::new(),
        at_result: Vec::new(),
        done_calls: 0,
    };

    test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut observer,
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    // Progress for link i arrives after the seed and i subpages were served,
    // and before link i itself is requested
    assert_eq!(observer.at_progress, vec![(0, 1), (1, 2), (2, 3)]);
    // Result for link i arrives before link i + 1 is requested
    assert_eq!(observer.at_result, vec![(0, 2), (1, 3), (2, 4)]);
    assert_eq!(observer.done_calls, 1);
}

#[tokio::test]
async fn test_failing_link_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/missing">404</a><a href="{}">down</a><a href="/ok">ok</a>"#,
            UNREACHABLE
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<footer>Contact a@b.com</footer>"),
        )
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", "mail a@b.com").await;

    let mut events: Vec<CrawlEvent> = Vec::new();
    let summary = test_coordinator()
        .run(
            &format!("{}/", base_url),
            "a@b.com",
            &mut events,
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    assert_eq!(summary.results.len(), 3);
    // A 404 page is still scanned
    assert_eq!(summary.results[0].outcome, ScanOutcome::Found(1));
    assert!(summary.results[1].outcome.is_failure());
    assert_eq!(summary.results[2].outcome, ScanOutcome::Found(1));

    assert_eq!(
        results_as_pairs(&summary.results),
        vec![
            (format!("{}/missing", base_url), 1),
            (UNREACHABLE.to_string(), 0),
            (format!("{}/ok", base_url), 1),
        ]
    );
    assert_eq!(summary.failed_pages(), 1);
    assert_eq!(events.len(), 7);
}

#[tokio::test]
async fn test_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="one">1</a><a href="/two">2</a><a href="one">1 again</a>"#,
    )
    .await;
    mount_page(&mock_server, "/one", "a@b.com a@b.com a@b.com").await;
    mount_page(&mock_server, "/two", "nothing").await;

    let coordinator = test_coordinator();
    let seed = format!("{}/", mock_server.uri());

    let first = coordinator
        .run(&seed, "a@b.com", &mut Vec::<CrawlEvent>::new(), &CancelFlag::new())
        .await
        .expect("First crawl failed");
    let second = coordinator
        .run(&seed, "a@b.com", &mut Vec::<CrawlEvent>::new(), &CancelFlag::new())
        .await
        .expect("Second crawl failed");

    assert_eq!(first.results, second.results);
    assert_eq!(
        results_as_pairs(&first.results),
        vec![
            (format!("{}/one", mock_server.uri()), 3),
            (format!("{}/two", mock_server.uri()), 0),
            (format!("{}/one", mock_server.uri()), 3),
        ]
    );
}

#[tokio::test]
async fn test_duplicate_links_scanned_each_time() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/same">1</a><a href="/same">2</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/same"))
        .respond_with(html_page("a@b.com"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let summary = test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut Vec::<CrawlEvent>::new(),
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.total_occurrences(), 2);
}

/// Cancels the crawl as soon as the first result arrives
struct CancelAfterFirst {
    cancel: CancelFlag,
    results: usize,
    done_calls: usize,
}

impl CrawlObserver for CancelAfterFirst {
    fn on_result(&mut self, _index: usize, _result: &ScanResult) {
        self.results += 1;
        self.cancel.cancel();
    }

    fn on_done(&mut self, _summary: &CrawlSummary) {
        self.done_calls += 1;
    }
}

#[tokio::test]
async fn test_cancellation_stops_between_scans() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/first">1</a><a href="/second">2</a><a href="/third">3</a>"#,
    )
    .await;
    mount_page(&mock_server, "/first", "a@b.com").await;

    for page in ["/second", "/third"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page("a@b.com"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let cancel = CancelFlag::new();
    let mut observer = CancelAfterFirst {
        cancel: cancel.clone(),
        results: 0,
        done_calls: 0,
    };

    let summary = test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut observer,
            &cancel,
        )
        .await
        .expect("Crawl failed");

    assert!(summary.cancelled);
    assert_eq!(summary.links_found, 3);
    assert_eq!(summary.results.len(), 1);
    assert!(!summary.is_complete());
    assert_eq!(observer.results, 1);
    assert_eq!(observer.done_calls, 1);
}

#[tokio::test]
async fn test_channel_observer_delivers_events_in_order() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/x">X</a><a href="/y">Y</a>"#).await;
    mount_page(&mock_server, "/x", "a@b.com").await;
    mount_page(&mock_server, "/y", "").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let coordinator = test_coordinator();
    let seed = format!("{}/", mock_server.uri());

    let handle = tokio::spawn(async move {
        let mut observer = ChannelObserver::new(tx);
        coordinator
            .run(&seed, "a@b.com", &mut observer, &CancelFlag::new())
            .await
    });

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    let summary = handle.await.unwrap().expect("Crawl failed");
    assert_eq!(events.len(), 5);

    let x = format!("{}/x", mock_server.uri());
    let y = format!("{}/y", mock_server.uri());
    assert_eq!(
        events[0],
        CrawlEvent::Progress {
            index: 0,
            total: 2,
            url: x.clone()
        }
    );
    assert_eq!(
        events[1],
        CrawlEvent::Result {
            index: 0,
            result: ScanResult::new(x, ScanOutcome::Found(1))
        }
    );
    assert_eq!(
        events[2],
        CrawlEvent::Progress {
            index: 1,
            total: 2,
            url: y.clone()
        }
    );
    assert_eq!(
        events[3],
        CrawlEvent::Result {
            index: 1,
            result: ScanResult::new(y, ScanOutcome::NotFound)
        }
    );
    assert_eq!(events[4], CrawlEvent::Done(summary));
}

#[tokio::test]
async fn test_links_resolved_against_seed_path() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs/index.html",
        r##"<a href="page">rel</a><a href="/root">abs</a><a href="#frag">frag</a><a href="?q=1">query</a>"##,
    )
    .await;

    let client = test_coordinator().client().clone();
    let links = fetch_links(&client, &format!("{}/docs/index.html", base_url))
        .await
        .expect("Failed to fetch links");

    assert_eq!(
        links,
        vec![
            format!("{}/docs/page", base_url),
            format!("{}/root", base_url),
            format!("{}/docs/index.html#frag", base_url),
            format!("{}/docs/index.html?q=1", base_url),
        ]
    );
}

#[tokio::test]
async fn test_legacy_helpers_collapse_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"<a href="/x">a@b.com</a>"#),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/page", "a@b.com, a@b.com").await;

    let client = test_coordinator().client().clone();
    let gone = format!("{}/gone", mock_server.uri());
    let page = format!("{}/page", mock_server.uri());

    assert_eq!(
        extract_links_or_empty(&client, &gone).await,
        vec![format!("{}/x", mock_server.uri())]
    );
    assert!(extract_links_or_empty(&client, UNREACHABLE).await.is_empty());
    assert_eq!(count_page_occurrences(&client, &gone, "a@b.com").await, 1);
    assert_eq!(count_page_occurrences(&client, UNREACHABLE, "a@b.com").await, 0);
    assert_eq!(count_page_occurrences(&client, &page, "a@b.com").await, 2);
}

#[tokio::test]
async fn test_fetch_body_returns_body_for_any_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(ResponseTemplate::new(418).set_body_string("short and stout"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fine", "hello").await;

    let client = test_coordinator().client().clone();

    let body = fetch_body(&client, &format!("{}/fine", mock_server.uri()))
        .await
        .expect("Fetch failed");
    assert_eq!(body, "<html><body>hello</body></html>");

    assert_eq!(
        fetch_body(&client, &format!("{}/teapot", mock_server.uri())).await,
        Ok("short and stout".to_string())
    );
    assert!(matches!(
        fetch_body(&client, "not a url").await,
        Err(FetchError::InvalidUrl { .. })
    ));
    assert!(matches!(
        fetch_body(&client, UNREACHABLE).await,
        Err(FetchError::Connect(_))
    ));
}

#[tokio::test]
async fn test_crawl_then_export_csv() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/p1">1</a><a href="/p2">2</a>"#).await;
    mount_page(&mock_server, "/p1", "a@b.com").await;
    mount_page(&mock_server, "/p2", "").await;

    let summary = test_coordinator()
        .run(
            &format!("{}/", mock_server.uri()),
            "a@b.com",
            &mut Vec::<CrawlEvent>::new(),
            &CancelFlag::new(),
        )
        .await
        .expect("Crawl failed");

    let dir = tempfile::TempDir::new().unwrap();
    let csv_path = dir.path().join("results.csv");
    export_results(&summary.results, &csv_path).expect("Export failed");

    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(
        content.lines().collect::<Vec<_>>(),
        vec![
            "Subpage,Email Count".to_string(),
            format!("{}/p1,1", mock_server.uri()),
            format!("{}/p2,0", mock_server.uri()),
        ]
    );
}
