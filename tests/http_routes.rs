mod common;

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use pagewright::infra::http::{AdminState, HttpState, build_admin_router, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{FixtureOptions, SiteFixture, blog_post, site, web_page};

fn routers(fixture: SiteFixture) -> (Router, Router, SiteFixture) {
    let renderer = Arc::new(fixture.renderer.clone());
    let public = build_router(HttpState {
        renderer: renderer.clone(),
    });
    let admin = build_admin_router(AdminState {
        renderer,
        slugs: Arc::new(fixture.slugs.clone()),
        db: None,
    });
    (public, admin, fixture)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn unknown_page_is_served_as_html_404() {
    let (public, _, _fixture) = routers(site(FixtureOptions::default()));

    let response = public.oneshot(get("/no-such-page")).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).expect("content type"),
        "text/html; charset=utf-8"
    );
    let body = body_text(response).await;
    assert!(body.contains("<h1>Not Found</h1>"));
    assert!(body.contains("<!-- error: "));
}

#[tokio::test]
async fn root_serves_the_home_page() {
    let (public, _, _fixture) = routers(site(FixtureOptions::default()));

    let response = public.oneshot(get("/")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.starts_with("<h1>Login</h1>"));
}

#[tokio::test]
async fn suffixed_path_resolves() {
    let (public, _, _fixture) = routers(site(FixtureOptions::default()));

    let response = public
        .oneshot(get("/about-us.html"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("About static about-us"));
}

#[tokio::test]
async fn nested_path_resolves_as_a_single_slug() {
    let (public, _, fixture) = routers(site(FixtureOptions::default()));
    fixture
        .repos
        .upsert_record(blog_post("POST-1", "Launch Notes", "blog/launch-notes", true))
        .await;

    let response = public
        .oneshot(get("/blog/launch-notes/"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.starts_with("<h1>Launch Notes</h1>"));
    assert!(body.contains("<!-- page: blog/launch-notes\nload status: fresh -->"));
}

#[tokio::test]
async fn title_update_returns_saved_title_and_slug() {
    let (_, admin, fixture) = routers(site(FixtureOptions::default()));
    fixture
        .repos
        .upsert_record(web_page("PAGE-1", "Contact", "contact"))
        .await;

    let response = admin
        .oneshot(json_request(
            Method::PUT,
            "/records/web_page/PAGE-1/title",
            json!({ "title": "Get In Touch" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(
        body,
        json!({
            "kind": "web_page",
            "name": "PAGE-1",
            "title": "Get In Touch",
            "slug": "get-in-touch"
        })
    );
}

#[tokio::test]
async fn duplicate_title_is_a_conflict() {
    let (_, admin, fixture) = routers(site(FixtureOptions::default()));
    fixture
        .repos
        .upsert_record(web_page("PAGE-1", "About Us", "about-us"))
        .await;
    fixture
        .repos
        .upsert_record(web_page("PAGE-2", "Draft", "draft"))
        .await;

    let response = admin
        .oneshot(json_request(
            Method::PUT,
            "/records/web_page/PAGE-2/title",
            json!({ "title": "About Us" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(
        body["error"],
        "A Web Page with the same title already exists. Please change the title of PAGE-2 and save again."
    );
}

#[tokio::test]
async fn unknown_record_kind_is_a_bad_request() {
    let (_, admin, _fixture) = routers(site(FixtureOptions::default()));

    let response = admin
        .oneshot(json_request(
            Method::PUT,
            "/records/recipe/R-1/title",
            json!({ "title": "Soup" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cache_clear_without_body_drops_every_page() {
    let (_, admin, fixture) = routers(site(FixtureOptions::default()));
    fixture.cache.put("about-us", "<p>a</p>");
    fixture.cache.put("login", "<p>b</p>");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/cache/clear")
        .body(Body::empty())
        .expect("request");
    let response = admin.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(body, json!({ "removed": 2 }));
    assert!(fixture.store.is_empty());
}

#[tokio::test]
async fn cache_clear_with_slug_drops_one_page() {
    let (_, admin, fixture) = routers(site(FixtureOptions::default()));
    fixture.cache.put("about-us", "<p>a</p>");
    fixture.cache.put("login", "<p>b</p>");

    let response = admin
        .oneshot(json_request(
            Method::POST,
            "/cache/clear",
            json!({ "slug": "about-us" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(fixture.cache.get("about-us").is_none());
    assert!(fixture.cache.get("login").is_some());
}

#[tokio::test]
async fn health_without_database_is_no_content() {
    let (_, admin, _fixture) = routers(site(FixtureOptions::default()));

    let response = admin.oneshot(get("/_health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().expect("log buffer").clone()).expect("utf-8 logs")
    }
}

#[tokio::test(flavor = "current_thread")]
async fn root_and_slug_routes_log_each_page_served() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (public, _, _fixture) = routers(site(FixtureOptions::default()));
    public.clone().oneshot(get("/")).await.expect("response");
    public.oneshot(get("/about-us")).await.expect("response");

    let text = logs.text();
    assert_eq!(text.matches("page served").count(), 2, "{text}");
    assert!(text.contains("slug=about-us"), "{text}");
}
