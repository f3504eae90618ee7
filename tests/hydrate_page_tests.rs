//! End-to-end hydration of a page against a mock Modrinth API and icon CDN.

use std::time::Duration;

use icon_hydrator::{
    HttpImageProbe, HydrationReport, Hydrator, HydratorConfig, JsonFileStore, KeyValueStore,
    MemoryStore, Page,
};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Voxy shaders</title></head>
<body>
  <section class="shaderGrid">
    <article class="shaderCard" data-modrinth="complementary-reimagined">
      <div class="shaderCard__logo">
        <img class="shaderCard__logoImg" src="img/logo-c.svg" alt="">
        <span class="shaderCard__logoFallback">C</span>
      </div>
      <h3>Complementary Reimagined</h3>
    </article>
    <article class="shaderCard" data-modrinth="broken-icon">
      <div class="shaderCard__logo">
        <img class="shaderCard__logoImg" src="img/logo-b.svg" alt="">
      </div>
    </article>
    <article class="shaderCard" data-modrinth="unknown-pack">
      <div class="shaderCard__logo">
        <img class="shaderCard__logoImg" src="img/logo-u.svg" alt="">
      </div>
    </article>
  </section>
</body>
</html>"#;

async fn mock_modrinth() -> MockServer {
    let mock_server = MockServer::start().await;
    let icons = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/v2/project/complementary-reimagined"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "slug": "complementary-reimagined",
            "title": "Complementary Shaders - Reimagined",
            "icon_url": format!("{icons}/icons/complementary.png")
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/project/broken-icon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "slug": "broken-icon",
            "icon_url": format!("{icons}/icons/broken.png")
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/project/unknown-pack"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/icons/complementary.png"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/icons/broken.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mock_server
}

fn config_for(mock_server: &MockServer) -> HydratorConfig {
    HydratorConfig::default()
        .with_api_base(format!("{}/v2", mock_server.uri()))
        .with_timeout(Duration::from_secs(2))
}

fn probe() -> HttpImageProbe {
    HttpImageProbe::with_client(reqwest::Client::new(), Duration::from_secs(2))
}

#[tokio::test]
async fn hydrates_page_and_persists_only_working_icons() {
    let mock_server = mock_modrinth().await;
    let config = config_for(&mock_server);
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("icon_cache.json");

    let page = Page::parse(PAGE, config.markup.clone());
    let mut hydrator = Hydrator::new(&config, JsonFileStore::open(&cache_path), probe()).unwrap();

    let report = hydrator.run(&page).await;

    assert_eq!(
        report,
        HydrationReport {
            cards: 3,
            skipped: 0,
            unavailable: 1,
            loaded: 1,
            load_failed: 1,
        }
    );

    let html = page.html();
    let icon = format!("{}/icons/complementary.png", mock_server.uri());
    assert!(html.contains(&format!(r#"src="{icon}""#)));
    assert!(html.contains(r#"class="shaderCard has-icon""#));
    assert!(html.contains(r#" src="img/logo-b.svg""#));
    assert!(html.contains(r#" src="img/logo-u.svg""#));
    assert!(!html.contains(r#"data-fallback-src="img/logo-u.svg""#));
    assert_eq!(html.matches("has-icon").count(), 1);

    // the broken icon was cached on fetch and evicted after its load failed
    let reopened = JsonFileStore::open(&cache_path);
    assert_eq!(reopened.len(), 1);
    assert_eq!(
        reopened.get("mr_icon_url:complementary-reimagined"),
        Some(icon)
    );
    assert!(reopened.get("mr_icon_url:broken-icon").is_none());
}

#[tokio::test]
async fn second_run_uses_persisted_cache() {
    let mock_server = mock_modrinth().await;
    let config = config_for(&mock_server);
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("icon_cache.json");

    {
        let page = Page::parse(PAGE, config.markup.clone());
        let mut hydrator =
            Hydrator::new(&config, JsonFileStore::open(&cache_path), probe()).unwrap();
        hydrator.run(&page).await;
    }
    let first_lookups = lookups(&mock_server, "complementary-reimagined").await;
    assert_eq!(first_lookups, 1);

    let page = Page::parse(PAGE, config.markup.clone());
    let mut hydrator = Hydrator::new(&config, JsonFileStore::open(&cache_path), probe()).unwrap();
    let report = hydrator.run(&page).await;

    assert_eq!(report.loaded, 1);
    assert_eq!(lookups(&mock_server, "complementary-reimagined").await, 1);
    // evicted on the first run, so looked up again
    assert_eq!(lookups(&mock_server, "broken-icon").await, 2);
}

#[tokio::test]
async fn unreachable_api_leaves_page_untouched() {
    let config = HydratorConfig::default()
        .with_api_base("http://127.0.0.1:1/v2")
        .with_timeout(Duration::from_secs(2));
    let page = Page::parse(PAGE, config.markup.clone());
    let before = page.html();

    let mut hydrator = Hydrator::new(&config, MemoryStore::new(), probe()).unwrap();
    let report = hydrator.run(&page).await;

    assert_eq!(report.unavailable, 3);
    assert_eq!(page.html(), before);
    assert!(hydrator.into_store().is_empty());
}

async fn lookups(mock_server: &MockServer, slug: &str) -> usize {
    let wanted = format!("/v2/project/{slug}");
    mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}
