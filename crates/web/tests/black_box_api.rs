use std::sync::Arc;

use axum::{Router, extract::State, response::Response, routing::get};
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;

use newsfeed_core::NewsItemId;
use newsfeed_news::{Category, NewNewsItem, NewsItem, RequestUser};
use newsfeed_render::{Encoder, LazyQuery, Value};
use newsfeed_web::Renderer;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(renderer: Renderer) -> Self {
        let app = test_router(renderer);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn sample_items() -> Arc<Vec<NewsItem>> {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let item = NewsItem::create(
        NewsItemId::from_uuid(uuid::Uuid::nil()),
        NewNewsItem {
            title: "Nuevo puente".to_string(),
            link: "https://example.com/puente".to_string(),
            description: r#"<p onclick="x()">Obras <img src="https://example.com/p.png"></p>"#
                .to_string(),
            category: Some(Category::Nacional),
            city: "Santiago".to_string(),
            tags: "obras,transporte".to_string(),
        },
        now,
    )
    .unwrap();
    Arc::new(vec![item])
}

fn test_router(renderer: Renderer) -> Router {
    Router::new()
        .route("/news", get(news))
        .route("/me", get(me))
        .route("/broken", get(broken))
        .route("/bare-list", get(bare_list))
        .with_state(renderer)
}

async fn news(State(renderer): State<Renderer>) -> Response {
    let items = sample_items();
    let query = LazyQuery::new("news_items", move || {
        items.iter().cloned().map(Value::object).collect()
    });
    renderer.respond(&Value::map([("items", Value::Query(query))]))
}

async fn me(State(renderer): State<Renderer>) -> Response {
    let user = RequestUser::Anonymous;
    renderer.respond(&Value::map([
        ("user", Value::from(&user)),
        ("is_authenticated", Value::from(user.is_authenticated())),
    ]))
}

async fn broken(State(renderer): State<Renderer>) -> Response {
    renderer.respond(&Value::map([("conn", Value::opaque("DbConnection"))]))
}

async fn bare_list(State(renderer): State<Renderer>) -> Response {
    renderer.respond(&Value::list([Value::from("a")]))
}

#[tokio::test]
async fn news_listing_is_encoded_and_sanitized() {
    let srv = TestServer::spawn(Renderer::default()).await;

    let res = reqwest::get(format!("{}/news", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );

    let body: serde_json::Value = res.json().await.unwrap();
    let item = &body["items"][0];
    assert_eq!(item["id"], json!("00000000-0000-0000-0000-000000000000"));
    assert_eq!(item["category"], json!("NACIONAL"));
    assert_eq!(item["tags"], json!(["obras", "transporte"]));

    let description = item["description"].as_str().unwrap();
    assert!(!description.contains("onclick"));
    assert!(description.contains(r#"src="https://example.com/p.png""#));
}

#[tokio::test]
async fn anonymous_user_is_null() {
    let srv = TestServer::spawn(Renderer::default()).await;

    let body: serde_json::Value = reqwest::get(format!("{}/me", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"user": null, "is_authenticated": false}));
}

#[tokio::test]
async fn unencodable_values_return_json_errors() {
    let srv = TestServer::spawn(Renderer::default()).await;

    let res = reqwest::get(format!("{}/broken", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("unsupported_type"));
    assert!(body["message"].as_str().unwrap().contains("DbConnection"));
}

#[tokio::test]
async fn lenient_mode_still_refuses_unencodable_values() {
    let srv = TestServer::spawn(Renderer::new(Encoder::lenient(), true)).await;

    let res = reqwest::get(format!("{}/broken", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("not_json_representable"));
}

#[tokio::test]
async fn top_level_list_depends_on_safe_flag() {
    let safe = TestServer::spawn(Renderer::default()).await;
    let res = reqwest::get(format!("{}/bare-list", safe.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let unsafe_srv = TestServer::spawn(Renderer::new(Encoder::strict(), false)).await;
    let body: serde_json::Value = reqwest::get(format!("{}/bare-list", unsafe_srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!(["a"]));
}
