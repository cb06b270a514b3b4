//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use doc_scraper::config::{OutputConfig, ScraperConfig};
use doc_scraper::crawler::{Coordinator, CrawlObserver, RecordingObserver};
use doc_scraper::output::{read_json, write_all, OutputPaths};
use doc_scraper::selection::{LinkSelector, PatternSelector, SelectAll};
use doc_scraper::{CrawlPhase, ScraperError, SiteTemplate};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and delays
fn create_test_config() -> ScraperConfig {
    ScraperConfig {
        concurrency: 3,
        timeout_secs: 2,
        retry_attempts: 3,
        retry_delay_ms: 10,
        user_agent: "TestBot/1.0".to_string(),
        ..ScraperConfig::default()
    }
}

fn coordinator_with(config: &ScraperConfig) -> (Coordinator, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let coordinator = Coordinator::new(config, observer.clone() as Arc<dyn CrawlObserver>)
        .expect("Failed to build coordinator");
    (coordinator, observer)
}

/// Mounts an HTML page that must be requested exactly once
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_wave_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        format!(
            r#"<html><head><title>Docs Home</title></head><body>
            <nav>Navigation</nav>
            <main><p>Welcome to the docs.</p></main>
            <a href="/docs/a">A</a>
            <a href="{base}/docs/b#install">B</a>
            <a href="/blog/news">Blog</a>
            <a href="https://other.example/docs/x">Other</a>
            <a href="/docs/manual.pdf">PDF</a>
            </body></html>"#
        ),
    )
    .await;
    mount_page(
        &server,
        "/docs/a",
        r#"<html><head><title>Page A</title></head><body>
            <article><p>Alpha content.</p></article>
            <a href="/docs/c">C</a><a href="/docs/">Home</a><a href="/docs/b">B</a>
            </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/docs/b",
        r#"<html><head><title>Page B</title></head><body><main>Beta</main>
            <a href="/docs/c">C</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/docs/c",
        r#"<html><head><title>Page C</title></head><body><p>Gamma</p></body></html>"#
            .to_string(),
    )
    .await;

    let (mut coordinator, observer) = coordinator_with(&create_test_config());
    let result = coordinator
        .crawl(&format!("{}/docs/", base))
        .await
        .expect("Crawl failed");

    assert_eq!(coordinator.phase(), CrawlPhase::Completed);
    assert_eq!(result.template, SiteTemplate::Generic);
    assert!(result.failed.is_empty());

    let urls: HashSet<String> = result.pages.iter().map(|p| p.url.clone()).collect();
    let expected: HashSet<String> = ["/docs/", "/docs/a", "/docs/b", "/docs/c"]
        .iter()
        .map(|p| format!("{}{}", base, p))
        .collect();
    assert_eq!(urls, expected);
    assert_eq!(result.pages.len(), 4, "every page recorded exactly once");

    // The seed is recorded first, from the discovery fetch
    assert_eq!(result.pages[0].title, "Docs Home");
    assert_eq!(result.pages[0].content, "Welcome to the docs.");

    let page_a = result.pages.iter().find(|p| p.title == "Page A").unwrap();
    assert_eq!(page_a.content, "Alpha content.");

    // Progress counts up by one and ends with everything dispatched complete
    let progress = observer.progress();
    for (i, (completed, total)) in progress.iter().enumerate() {
        assert_eq!(*completed, i + 1);
        assert!(completed <= total);
    }
    assert_eq!(progress.last(), Some(&(4, 4)));
}

#[tokio::test]
async fn test_seed_without_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Lonely</title></head><body><p>Nothing else here.</p></body></html>"
            .to_string(),
    )
    .await;

    let (mut coordinator, _) = coordinator_with(&create_test_config());
    let result = coordinator.crawl(&server.uri()).await.expect("Crawl failed");

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].title, "Lonely");
    assert!(result.failed.is_empty());
}

#[tokio::test]
async fn test_failed_page_is_recorded_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        r#"<a href="/docs/ok">OK</a><a href="/docs/broken">Broken</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/docs/ok", "<p>Fine</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/docs/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let (mut coordinator, observer) = coordinator_with(&create_test_config());
    let result = coordinator
        .crawl(&format!("{}/docs/", base))
        .await
        .expect("Crawl failed");

    let broken = format!("{}/docs/broken", base);
    assert_eq!(result.pages.len(), 2);
    assert_eq!(result.failed.len(), 1);
    assert!(result.failed.contains(&broken));
    assert!(result.pages.iter().all(|p| !result.failed.contains(&p.url)));
    assert_eq!(result.total_submitted(), 3);

    assert_eq!(observer.errors().len(), 1);
    assert!(observer.errors()[0].contains(&broken));
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        r#"<a href="/docs/flaky">Flaky</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/docs/flaky",
        "<title>Eventually</title><p>Made it</p>".to_string(),
    )
    .await;

    let (mut coordinator, _) = coordinator_with(&create_test_config());
    let result = coordinator
        .crawl(&format!("{}/docs/", base))
        .await
        .expect("Crawl failed");

    assert!(result.failed.is_empty());
    assert!(result.pages.iter().any(|p| p.title == "Eventually"));
}

#[tokio::test]
async fn test_seed_failure_fails_the_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let (mut coordinator, observer) = coordinator_with(&create_test_config());
    let err = coordinator
        .crawl(&format!("{}/docs/", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::SeedFetch { .. }));
    assert_eq!(coordinator.phase(), CrawlPhase::Failed);
    assert!(observer.progress().is_empty());
    assert_eq!(observer.errors().len(), 1);
}

#[tokio::test]
async fn test_seed_timeout_fails_the_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = ScraperConfig {
        timeout_secs: 1,
        retry_attempts: 1,
        ..create_test_config()
    };
    let (mut coordinator, _) = coordinator_with(&config);

    let err = coordinator.crawl(&server.uri()).await.unwrap_err();
    assert!(matches!(err, ScraperError::SeedFetch { .. }));
    assert_eq!(coordinator.phase(), CrawlPhase::Failed);
}

#[tokio::test]
async fn test_selection_variant_scrapes_only_selection() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/guide/",
        r#"<title>Guide</title>
           <a href="/guide/install">Install</a>
           <a href="/guide/usage">Usage</a>
           <a href="/blog/post">Post</a>
           <a href="/wp-admin/">Admin</a>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/guide/install",
        r#"<title>Install</title><main>Run it.</main><a href="/guide/deeper">Deeper</a>"#
            .to_string(),
    )
    .await;
    mount_page(
        &server,
        "/blog/post",
        "<title>Post</title><p>News</p>".to_string(),
    )
    .await;
    // Never selected, never followed
    Mock::given(method("GET"))
        .and(path("/guide/usage"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/guide/deeper"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut coordinator, observer) = coordinator_with(&create_test_config());
    let selector = PatternSelector::new(&["install$", "/blog/"], &[]).unwrap();

    let result = coordinator
        .run_interactive(&format!("{}/guide/", base), &selector)
        .await
        .expect("Scrape failed");

    // Domain-wide scope minus noise: the admin link never shows up
    let discovered = observer.discovered();
    assert_eq!(discovered.len(), 3);
    assert!(discovered.iter().all(|l| !l.contains("wp-admin")));

    let titles: HashSet<&str> = result.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, HashSet::from(["Install", "Post"]));
    assert_eq!(observer.progress().last(), Some(&(2, 2)));
    assert_eq!(coordinator.phase(), CrawlPhase::Completed);
}

#[tokio::test]
async fn test_cancelled_selection() {
    struct Cancel;
    impl LinkSelector for Cancel {
        fn select(&self, _discovered: &[String]) -> Option<Vec<String>> {
            None
        }
    }

    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">A</a>"#.to_string()).await;

    let (mut coordinator, _) = coordinator_with(&create_test_config());
    let err = coordinator
        .run_interactive(&server.uri(), &Cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ScraperError::SelectionAborted));
    assert_eq!(coordinator.phase(), CrawlPhase::Selecting);
}

#[tokio::test]
async fn test_templated_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/blog/",
        r#"<html><head><title>Blog</title>
            <meta name="generator" content="WordPress 6.4">
            </head><body>
            <div class="post-content">
                <h2>Specs</h2>
                <table>
                    <tr><th>Name</th><th>Value</th></tr>
                    <tr><td>foo</td><td>bar</td></tr>
                </table>
            </div>
            <a href="/blog/post-1/">Post 1</a>
            <a href="/blog/feed/">Feed</a>
            </body></html>"#
            .to_string(),
    )
    .await;
    // No generator tag here; the seed's classification still applies
    mount_page(
        &server,
        "/blog/post-1/",
        r#"<html><head><title>Post 1</title></head><body>
            <div class="entry-content"><p>First   post.</p><ul><li>one</li></ul></div>
            </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/feed/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<rss/>"))
        .mount(&server)
        .await;

    let (mut coordinator, _) = coordinator_with(&create_test_config());
    let result = coordinator
        .crawl(&format!("{}/blog/", base))
        .await
        .expect("Crawl failed");

    assert_eq!(result.template, SiteTemplate::Templated);

    let seed = result.pages.iter().find(|p| p.title == "Blog").unwrap();
    assert_eq!(
        seed.content,
        "## Specs\n\nName | Value\n------------\nfoo | bar"
    );

    let post = result.pages.iter().find(|p| p.title == "Post 1").unwrap();
    assert_eq!(post.content, "First post.\n\n- one");
}

#[tokio::test]
async fn test_select_all_then_write_outputs() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/docs/",
        r#"<a href="/docs/a">A</a><a href="/docs/missing">Missing</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/docs/a", "<title>A</title><p>Alpha</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/docs/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (mut coordinator, _) = coordinator_with(&create_test_config());
    let seed = format!("{}/docs/", base);
    let result = coordinator
        .run_interactive(&seed, &SelectAll)
        .await
        .expect("Scrape failed");

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let output = OutputConfig {
        directory: tmp.path().to_path_buf(),
        ..OutputConfig::default()
    };
    let paths = OutputPaths::for_seed(&output.directory, &url::Url::parse(&seed).unwrap());

    let written = write_all(&result, &paths, &output).expect("Failed to write outputs");
    assert_eq!(written.len(), 3);

    let records = read_json(&paths.json).expect("Failed to read JSON");
    assert_eq!(records, result.pages);

    let text = std::fs::read_to_string(&paths.text).unwrap();
    assert!(text.starts_with(&format!("Title: A\nURL: {}/docs/a\n\nAlpha\n\n", base)));

    let failed = std::fs::read_to_string(&paths.failed).unwrap();
    assert_eq!(failed, format!("{}/docs/missing\n", base));
}
