//! Integration tests for the orrery-gw API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Sort parameter validation (rejected before any upstream call)
//! - Full-collection aggregation across pages
//! - Resident reference resolution with per-link failure isolation
//! - Freshness cache behavior across the TTL window

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use orrery_gw::cache::{Clock, FreshnessCache};
use orrery_gw::upstream::{PageEnvelope, UpstreamApi, UpstreamError};
use orrery_gw::{build_router, AppState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tower::util::ServiceExt; // for `oneshot` method

const PAGE_SIZE: u32 = 10;

/// Manually-advanced clock so TTL expiry is deterministic
struct TestClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl TestClock {
    fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// Fake upstream registry: 13 people over 2 pages, 2 planets on 1 page.
///
/// Resident link "u/people/99" is unresolvable (404). Counts every upstream
/// call so tests can assert on fetch cycles.
struct MockUpstream {
    people_pages: Vec<Vec<Value>>,
    planet_pages: Vec<Vec<Value>>,
    names: HashMap<String, String>,
    page_calls: AtomicUsize,
    record_calls: AtomicUsize,
}

impl MockUpstream {
    fn new() -> Self {
        // Unsorted on purpose: the service must sort, not the upstream
        let people_names = [
            "Wedge", "Biggs", "Ackbar", "Leia", "Han", "Luke", "Chewbacca", "Lando", "Obi-Wan",
            "Yoda", "Rey", "Finn", "Poe",
        ];
        let people: Vec<Value> = people_names
            .iter()
            .map(|name| json!({ "name": name, "height": "170", "mass": "77" }))
            .collect();

        let planets = vec![
            json!({
                "name": "Alderaan",
                "residents": ["u/people/1", "u/people/99"],
            }),
            json!({
                "name": "Tatooine",
                "residents": ["u/people/2", "u/people/1"],
            }),
        ];

        let names = HashMap::from([
            ("u/people/1".to_string(), "Leia Organa".to_string()),
            ("u/people/2".to_string(), "Luke Skywalker".to_string()),
        ]);

        Self {
            people_pages: vec![people[..10].to_vec(), people[10..].to_vec()],
            planet_pages: vec![planets],
            names,
            page_calls: AtomicUsize::new(0),
            record_calls: AtomicUsize::new(0),
        }
    }

    fn upstream_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst) + self.record_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UpstreamApi for MockUpstream {
    async fn fetch_page(&self, resource: &str, page: u32) -> Result<PageEnvelope, UpstreamError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let pages = match resource {
            "people" => &self.people_pages,
            "planets" => &self.planet_pages,
            other => return Err(UpstreamError::Api(404, format!("no such resource: {}", other))),
        };
        let results = pages
            .get((page - 1) as usize)
            .ok_or_else(|| UpstreamError::Api(404, format!("no page {}", page)))?
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect();
        let count = pages.iter().map(|p| p.len() as u64).sum();
        Ok(PageEnvelope {
            count,
            results,
            next: None,
        })
    }

    async fn fetch_record(
        &self,
        link: &str,
    ) -> Result<serde_json::Map<String, Value>, UpstreamError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        match self.names.get(link) {
            Some(name) => Ok(json!({ "name": name }).as_object().unwrap().clone()),
            None => Err(UpstreamError::Api(404, "not found".to_string())),
        }
    }
}

/// Test helper: app + handles to the mock upstream and test clock
fn setup_app() -> (axum::Router, Arc<MockUpstream>, Arc<TestClock>) {
    let upstream = Arc::new(MockUpstream::new());
    let clock = Arc::new(TestClock::new());
    let cache = FreshnessCache::new(clock.clone());
    let state = AppState::new(upstream.clone(), Arc::new(cache), PAGE_SIZE);
    (build_router(state), upstream, clock)
}

/// Test helper: create GET request
fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn result_names(body: &Value) -> Vec<&str> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _) = setup_app();

    let response = app.oneshot(test_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "orrery-gw");
    assert!(body["version"].is_string());
}

// =============================================================================
// Sort Parameter Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_sort_by_rejected_without_upstream_calls() {
    let (app, upstream, _) = setup_app();

    let response = app
        .oneshot(test_request("/people?sortBy=color"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("sortBy"));
    assert_eq!(upstream.upstream_calls(), 0);
}

#[tokio::test]
async fn test_invalid_sort_order_rejected_without_upstream_calls() {
    let (app, upstream, _) = setup_app();

    let response = app
        .oneshot(test_request("/people?sortOrder=sideways"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("sortOrder"));
    assert_eq!(upstream.upstream_calls(), 0);
}

// =============================================================================
// People Aggregation
// =============================================================================

#[tokio::test]
async fn test_people_returns_full_collection_sorted_by_name_asc() {
    let (app, upstream, _) = setup_app();

    let response = app.oneshot(test_request("/people")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 13);
    let names = result_names(&body);
    assert_eq!(names.len(), 13);

    let mut expected = names.clone();
    expected.sort();
    assert_eq!(names, expected, "default sort is name ascending");

    // 2 pages, no reference resolution for people
    assert_eq!(upstream.page_calls.load(Ordering::SeqCst), 2);
    assert_eq!(upstream.record_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_people_sort_descending() {
    let (app, _, _) = setup_app();

    let response = app
        .oneshot(test_request("/people?sortBy=name&sortOrder=desc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let names = result_names(&body);
    let mut expected = names.clone();
    expected.sort();
    expected.reverse();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_people_sort_by_height_is_lexicographic() {
    let (app, _, _) = setup_app();

    let response = app
        .oneshot(test_request("/people?sortBy=height&sortOrder=asc"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 13);
}

// =============================================================================
// Planets Aggregation and Reference Resolution
// =============================================================================

#[tokio::test]
async fn test_planets_resolve_residents_with_failure_isolation() {
    let (app, upstream, _) = setup_app();

    let response = app.oneshot(test_request("/planets")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 2);

    // Failed lookup degrades to "Unknown" at its original position
    assert_eq!(
        body["results"][0]["residents"],
        json!(["Leia Organa", "Unknown"])
    );
    assert_eq!(
        body["results"][1]["residents"],
        json!(["Luke Skywalker", "Leia Organa"])
    );

    // u/people/1 appears under two planets but is looked up once;
    // 3 distinct links total (1, 2, 99)
    assert_eq!(upstream.record_calls.load(Ordering::SeqCst), 3);
}

// =============================================================================
// Freshness Cache
// =============================================================================

#[tokio::test]
async fn test_repeated_planets_calls_within_ttl_hit_the_cache() {
    let (app, upstream, _) = setup_app();

    let first = app
        .clone()
        .oneshot(test_request("/planets"))
        .await
        .unwrap();
    let first_body = extract_json(first.into_body()).await;
    let calls_after_first = upstream.upstream_calls();

    let second = app.oneshot(test_request("/planets")).await.unwrap();
    let second_body = extract_json(second.into_body()).await;

    assert_eq!(first_body, second_body);
    assert_eq!(upstream.upstream_calls(), calls_after_first);
}

#[tokio::test]
async fn test_concurrent_cold_requests_share_one_fetch_cycle() {
    let (app, upstream, _) = setup_app();

    // Both requests race on a cold cache; the per-resource single-flight
    // lock must collapse them into one fetch+resolve cycle
    let (first, second) = tokio::join!(
        app.clone().oneshot(test_request("/planets")),
        app.clone().oneshot(test_request("/planets"))
    );

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);

    let first_body = extract_json(first.into_body()).await;
    let second_body = extract_json(second.into_body()).await;
    assert_eq!(first_body, second_body);

    // 1 page fetch + 3 distinct resident lookups, exactly once
    assert_eq!(upstream.page_calls.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.record_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ttl_expiry_triggers_exactly_one_fresh_cycle() {
    let (app, upstream, clock) = setup_app();

    app.clone().oneshot(test_request("/planets")).await.unwrap();
    let calls_after_first = upstream.upstream_calls();

    clock.advance(Duration::from_secs(301));

    let response = app.oneshot(test_request("/planets")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Exactly one more full fetch+resolve cycle
    assert_eq!(upstream.upstream_calls(), calls_after_first * 2);
}

#[tokio::test]
async fn test_people_and_planets_are_cached_independently() {
    let (app, upstream, _) = setup_app();

    app.clone().oneshot(test_request("/people")).await.unwrap();
    assert_eq!(upstream.page_calls.load(Ordering::SeqCst), 2);

    app.clone().oneshot(test_request("/planets")).await.unwrap();
    assert_eq!(upstream.page_calls.load(Ordering::SeqCst), 3);

    // Both now served from cache
    app.clone().oneshot(test_request("/people")).await.unwrap();
    app.oneshot(test_request("/planets")).await.unwrap();
    assert_eq!(upstream.page_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_resorting_happens_on_every_request_even_on_cache_hit() {
    let (app, upstream, _) = setup_app();

    let asc = app
        .clone()
        .oneshot(test_request("/people?sortOrder=asc"))
        .await
        .unwrap();
    let asc_names = result_names(&extract_json(asc.into_body()).await)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let calls_after_first = upstream.upstream_calls();

    let desc = app
        .oneshot(test_request("/people?sortOrder=desc"))
        .await
        .unwrap();
    let desc_names = result_names(&extract_json(desc.into_body()).await)
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    let mut reversed = asc_names.clone();
    reversed.reverse();
    assert_eq!(desc_names, reversed);
    // Second request was a cache hit
    assert_eq!(upstream.upstream_calls(), calls_after_first);
}

// =============================================================================
// Upstream Failure
// =============================================================================

#[tokio::test]
async fn test_upstream_failure_is_an_opaque_server_error() {
    struct DownUpstream;

    #[async_trait::async_trait]
    impl UpstreamApi for DownUpstream {
        async fn fetch_page(
            &self,
            _resource: &str,
            _page: u32,
        ) -> Result<PageEnvelope, UpstreamError> {
            Err(UpstreamError::Network("connection refused".to_string()))
        }

        async fn fetch_record(
            &self,
            _link: &str,
        ) -> Result<serde_json::Map<String, Value>, UpstreamError> {
            Err(UpstreamError::Network("connection refused".to_string()))
        }
    }

    let state = AppState::new(
        Arc::new(DownUpstream),
        Arc::new(FreshnessCache::system()),
        PAGE_SIZE,
    );
    let app = build_router(state);

    let response = app.oneshot(test_request("/people")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = extract_json(response.into_body()).await;
    // Opaque: no upstream detail leaked
    assert_eq!(body["error"], "Upstream registry unavailable");
}
