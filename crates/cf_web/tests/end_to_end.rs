//! Full pipeline against a stubbed conference page: HTTP fetch, HTML
//! extraction, caching, joining and the JSON surface.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cf_cache::{ConferenceCache, ManualClock};
use cf_core::Config;
use cf_scrapers::ConferenceScraper;
use cf_web::{create_app, AppState};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <section id="speakers">
    <div class="flex-speakers-container">
      <div class="speaker media">
        <div class="media-left">
          <img class="img-circle lazy" data-src="https://elmeurope.org/images/ada.jpg">
        </div>
        <div class="media-body">
          <h3 class="media-heading"><a href="https://twitter.com/ada">Ada Lovelace</a></h3>
          <p class="media-sub">Analytical Engine</p>
          <p>Mathematician and first programmer.</p>
        </div>
      </div>
    </div>
  </section>
  <section id="schedule">
    <ul class="timeline">
      <li>
        <div class="timeline-badge"></div>
        <div class="timeline-panel">
          <div class="timeline-heading">
            <h4 class="timeline-title">Keynote</h4>
            <p><small class="text-muted">Monday, 12 June, 2017, 45 minutes</small></p>
            <p>Ada Lovelace</p>
          </div>
          <div class="timeline-body">
            <p>Notes on the Analytical Engine.</p>
          </div>
        </div>
      </li>
    </ul>
  </section>
</body>
</html>"#;

async fn upstream() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer) -> Config {
    Config::new()
        .with_url(format!("{}/", server.uri()))
        .with_cache_ttl(Duration::from_secs(600))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn upstream_hits(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn test_schedule_joins_scraped_speaker() {
    let server = upstream().await;
    let app = create_app(AppState::from_config(&config_for(&server)).unwrap());

    let (status, body) = get(&app, "/schedule").await;
    assert_eq!(status, StatusCode::OK);

    let items: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        items,
        json!([{
            "title": "Keynote",
            "speaker": {
                "name": "Ada Lovelace",
                "image": "https://elmeurope.org/images/ada.jpg",
                "bio": "Mathematician and first programmer."
            },
            "description": "Notes on the Analytical Engine.",
            // Noon on Monday 12 June 2017 in Paris
            "starts": "2017-06-12T10:00:00.000Z",
            "duration": 45
        }])
    );
}

#[tokio::test]
async fn test_speakers_cached_within_window() {
    let server = upstream().await;
    let app = create_app(AppState::from_config(&config_for(&server)).unwrap());

    let (_, first) = get(&app, "/speakers").await;
    let (_, second) = get(&app, "/speakers").await;

    assert_eq!(first, second);
    assert_eq!(upstream_hits(&server).await, 1);
}

#[tokio::test]
async fn test_expired_entry_refetches_once() {
    let server = upstream().await;
    let config = config_for(&server);
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2017, 6, 1, 8, 0, 0).unwrap()));
    let scraper = ConferenceScraper::from_config(&config).unwrap();
    let cache = ConferenceCache::with_clock(Arc::new(scraper), config.cache_ttl, clock.clone());
    let app = create_app(AppState::new(cache));

    get(&app, "/speakers").await;
    clock.advance(Duration::from_secs(601));
    get(&app, "/speakers").await;
    get(&app, "/speakers").await;

    assert_eq!(upstream_hits(&server).await, 2);
}

#[tokio::test]
async fn test_upstream_error_surfaces_as_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    let app = create_app(AppState::from_config(&config_for(&server)).unwrap());

    let (status, body) = get(&app, "/speakers").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
