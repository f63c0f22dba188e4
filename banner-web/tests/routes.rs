use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use banner::font::GlyphTable;
use banner::loader::{BannerSource, Cached, Directory, LoadError};
use banner_web::{AppState, Routes, ServerConfig, router};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tower::ServiceExt as _;

const H_ROWS: [&str; 8] = [
    "     ", "o    ", "|    ", "O--o ", "|  | ", "o  o ", "     ", "     ",
];

struct Fixture {
    _dir: TempDir,
    app: Router,
}

/// A banner directory with `thinkertoy` (only 'h' and '<' have visible rows) and a static dir.
fn fixture() -> Fixture {
    let dir = TempDir::new().expect("temp dir");
    let banners = dir.path().join("banners");
    let statics = dir.path().join("static");
    fs::create_dir(&banners).expect("create banners");
    fs::create_dir(&statics).expect("create static");

    let mut lines = vec![String::new(); 855];
    let h = ('h' as usize - 32) * 9;
    for (i, row) in H_ROWS.into_iter().enumerate() {
        lines[h + 1 + i] = row.to_owned();
    }
    let lt = ('<' as usize - 32) * 9;
    for row in 1..=8 {
        lines[lt + row] = "<&>".to_owned();
    }
    fs::write(banners.join("thinkertoy.txt"), lines.join("\r\n")).expect("write banner");
    fs::write(banners.join("empty.txt"), "").expect("write banner");
    fs::write(statics.join("style.css"), "body {}").expect("write css");

    let config = ServerConfig {
        static_dir: statics,
        ..ServerConfig::default()
    };
    let state = AppState::new(Arc::new(Cached::new(Directory::new(banners))));
    Fixture {
        _dir: dir,
        app: router(state, &config),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (
        status,
        content_type,
        String::from_utf8(body.to_vec()).expect("utf-8 body"),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .expect("request")
}

#[tokio::test]
async fn main_page() {
    let fixture = fixture();
    let (status, content_type, body) = send(&fixture.app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.contains(r#"<option value="empty" selected>empty</option>"#));
    assert!(body.contains(r#"<option value="thinkertoy">thinkertoy</option>"#));
    assert!(!body.contains("<pre"));
}

#[tokio::test]
async fn render_h() {
    let fixture = fixture();
    let (status, content_type, body) = send(
        &fixture.app,
        post_form("/ascii-art", "text=h&banner=thinkertoy"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    let expected = format!(
        "<pre class=\"art\">\n{}</pre>",
        "     \no    \n|    \nO--o \n|  | \no  o \n     \n     \n"
    );
    assert!(body.contains(&expected), "{body}");
    assert!(body.contains(r#"<option value="thinkertoy" selected>"#));
}

#[tokio::test]
async fn render_hello() {
    let fixture = fixture();
    let (status, _, body) = send(
        &fixture.app,
        post_form("/ascii-art", "text=Hello&banner=thinkertoy"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // only 'h' has visible rows, and "Hello" has no lowercase h
    assert!(body.contains("<pre class=\"art\">\n\n\n\n\n\n\n\n\n</pre>"));
}

#[tokio::test]
async fn art_is_escaped() {
    let fixture = fixture();
    let (status, _, body) = send(
        &fixture.app,
        post_form("/ascii-art", "text=%3C&banner=thinkertoy"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&"&lt;&amp;&gt;\n".repeat(8)));
    assert!(!body.contains("<&>"));
}

#[tokio::test]
async fn browser_line_breaks() {
    let fixture = fixture();
    let (status, _, body) = send(
        &fixture.app,
        post_form("/ascii-art", "text=h%0D%0A%0D%0Ah&banner=thinkertoy"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let block = "     \no    \n|    \nO--o \n|  | \no  o \n     \n     \n";
    assert!(body.contains(&format!("{block}\n{block}</pre>")));
}

#[tokio::test]
async fn invalid_text() {
    let fixture = fixture();
    for text in ["h%09h", "h%7F", "%0Dh", "caf%C3%A9", ""] {
        let form = format!("text={text}&banner=thinkertoy");
        let (status, content_type, _) = send(&fixture.app, post_form("/ascii-art", &form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{text:?}");
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    }
}

#[tokio::test]
async fn missing_fields() {
    let fixture = fixture();
    let (status, _, _) = send(&fixture.app, post_form("/ascii-art", "banner=thinkertoy")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _, _) = send(&fixture.app, post_form("/ascii-art", "text=h")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn not_a_form() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/ascii-art")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"h"}"#))
        .expect("request");
    let (status, _, _) = send(&fixture.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_banner() {
    let fixture = fixture();
    let (status, _, body) = send(&fixture.app, post_form("/ascii-art", "text=h&banner=shadow")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404 Not Found"));
    assert!(body.contains("banner &quot;shadow&quot; not found"));
}

#[tokio::test]
async fn invalid_banner_name() {
    let fixture = fixture();
    let (status, _, _) = send(
        &fixture.app,
        post_form("/ascii-art", "text=h&banner=..%2Fbanners%2Fthinkertoy"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_banner_renders_nothing() {
    let fixture = fixture();
    let (status, _, body) = send(&fixture.app, post_form("/ascii-art", "text=hi&banner=empty")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!("<pre class=\"art\">\n{}</pre>", "\n".repeat(8))));
}

#[tokio::test]
async fn wrong_methods() {
    let fixture = fixture();
    let (status, content_type, body) = send(&fixture.app, get("/ascii-art")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert!(body.contains("405 Method Not Allowed"));

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/")
        .body(Body::empty())
        .expect("request");
    let (status, _, _) = send(&fixture.app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unknown_route() {
    let fixture = fixture();
    for uri in ["/nope", "/ascii-art/extra", "/index.html"] {
        let (status, _, body) = send(&fixture.app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("404 Not Found"));
    }
}

#[tokio::test]
async fn static_files() {
    let fixture = fixture();
    let (status, content_type, body) = send(&fixture.app, get("/static/style.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/css"));
    assert_eq!(body, "body {}");
    let (status, _, _) = send(&fixture.app, get("/static/missing.css")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_routes() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("plain.txt"), "").expect("write banner");
    let config = ServerConfig {
        routes: Routes {
            index: "/banner".to_owned(),
            render: "/banner/render".to_owned(),
            static_prefix: "/assets".to_owned(),
        },
        static_dir: dir.path().to_owned(),
        ..ServerConfig::default()
    };
    let app = router(
        AppState::new(Arc::new(Directory::new(dir.path()))),
        &config,
    );

    let (status, _, body) = send(&app, get("/banner")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"action="/banner/render""#));
    assert!(body.contains(r#"href="/assets/style.css""#));

    let (status, _, _) = send(&app, post_form("/banner/render", "text=x&banner=plain")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_banner_directory() {
    let dir = TempDir::new().expect("temp dir");
    let config = ServerConfig {
        static_dir: dir.path().to_owned(),
        ..ServerConfig::default()
    };
    let app = router(
        AppState::new(Arc::new(Directory::new(dir.path().join("gone")))),
        &config,
    );

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<select name="banner"></select>"#), "{body}");

    let (status, _, _) = send(&app, post_form("/ascii-art", "text=h&banner=block")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// A source that takes far longer than any request is allowed to
struct Slow;

impl BannerSource for Slow {
    fn load(&self, _name: &str) -> Result<Arc<GlyphTable>, LoadError> {
        thread::sleep(Duration::from_millis(500));
        Ok(Arc::new(GlyphTable::default()))
    }

    fn names(&self) -> Result<Vec<String>, LoadError> {
        Ok(vec!["slow".to_owned()])
    }
}

#[tokio::test]
async fn slow_render_times_out() {
    let dir = TempDir::new().expect("temp dir");
    let config = ServerConfig {
        static_dir: dir.path().to_owned(),
        request_timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    };
    let app = router(AppState::new(Arc::new(Slow)), &config);

    let (status, _, _) = send(&app, post_form("/ascii-art", "text=h&banner=slow")).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    let (status, _, _) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
}
