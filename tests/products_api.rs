//! End-to-end tests against the assembled router with an in-memory repository.

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use product_api::{
    build_app, AppError, AppState, FixedWindowLimiter, InMemoryProductRepository, NewProduct,
    Product, ProductRepository, RateLimitConfig,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app_with(repo: Arc<dyn ProductRepository>, limit: RateLimitConfig) -> Router {
    build_app(
        AppState::new(repo),
        Arc::new(FixedWindowLimiter::new(limit)),
    )
}

fn app() -> (Router, Arc<InMemoryProductRepository>) {
    let repo = Arc::new(InMemoryProductRepository::new());
    let app = app_with(
        repo.clone(),
        RateLimitConfig {
            permit_limit: 1000,
            window: Duration::from_secs(10),
        },
    );
    (app, repo)
}

fn post_json(body: Value) -> Request<Body> {
    Request::post("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_products() -> Request<Body> {
    Request::get("/api/products").body(Body::empty()).unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn list_is_empty_without_rows() {
    let (app, _) = app();
    let resp = app.oneshot(get_products()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn create_returns_stored_record_and_location() {
    let (app, _) = app();
    let before = Utc::now();
    let resp = app
        .oneshot(post_json(json!({"name": "Widget", "price": 9.99})))
        .await
        .unwrap();
    let after = Utc::now();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()[header::LOCATION], "/api/products?id=1");
    let body = json_body(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["price"], 9.99);
    assert_eq!(body["isActive"], true);
    let created_at: chrono::DateTime<Utc> =
        serde_json::from_value(body["createdAt"].clone()).unwrap();
    assert!(created_at >= before && created_at <= after);
}

#[tokio::test]
async fn create_ignores_client_supplied_id_and_timestamp() {
    let (app, _) = app();
    let resp = app
        .oneshot(post_json(json!({
            "id": 42,
            "name": "Gadget",
            "price": 19.5,
            "isActive": false,
            "createdAt": "2000-01-01T00:00:00Z"
        })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["isActive"], false);
    assert_ne!(body["createdAt"], "2000-01-01T00:00:00Z");
}

#[tokio::test]
async fn short_name_is_rejected_without_writing() {
    let (app, repo) = app();
    let resp = app
        .clone()
        .oneshot(post_json(json!({"name": "W", "price": 9.99})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["details"]["name"].is_array());
    assert!(body["error"]["details"].get("price").is_none());
    assert!(repo.is_empty());

    let resp = app.oneshot(get_products()).await.unwrap();
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn each_single_constraint_violation_is_reported() {
    let cases = [
        (json!({"price": 9.99}), "name"),
        (json!({"name": "x".repeat(101), "price": 9.99}), "name"),
        (json!({"name": "Widget"}), "price"),
        (json!({"name": "Widget", "price": 0}), "price"),
        (json!({"name": "Widget", "price": 0.01}), "price"),
        (json!({"name": "Widget", "price": 10000.01}), "price"),
    ];
    for (payload, field) in cases {
        let (app, repo) = app();
        let resp = app.oneshot(post_json(payload.clone())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body = json_body(resp).await;
        let details = body["error"]["details"].as_object().unwrap();
        assert_eq!(details.keys().collect::<Vec<_>>(), vec![field], "{payload}");
        assert!(repo.is_empty());
    }
}

#[tokio::test]
async fn sub_cent_prices_are_judged_as_stored() {
    let (app, repo) = app();
    let resp = app
        .clone()
        .oneshot(post_json(json!({"name": "Widget", "price": 0.014})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"]["details"]["price"].is_array());
    assert!(repo.is_empty());

    let resp = app
        .oneshot(post_json(json!({"name": "Widget", "price": 10000.004})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["price"], 10000.0);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let name = "x".repeat(70 * 1024);
    let payload = json!({"name": name, "price": 9.99}).to_string();

    // No Content-Length: the limit trips while the body is being read.
    let (app, repo) = app();
    let req = Request::post("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.clone()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(resp).await["error"]["code"], "payload_too_large");
    assert!(repo.is_empty());

    let req = Request::post("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn list_returns_every_created_product() {
    let (app, _) = app();
    let submitted = [("Widget", 9.99), ("Gadget", 100.0), ("Gizmo", 10000.0)];
    for (name, price) in submitted {
        let resp = app
            .clone()
            .oneshot(post_json(json!({"name": name, "price": price})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = app.oneshot(get_products()).await.unwrap();
    let rows = json_body(resp).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), submitted.len());
    for (name, price) in submitted {
        assert!(
            rows.iter().any(|r| r["name"] == name && r["price"] == price),
            "{name} missing"
        );
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, repo) = app();
    let req = Request::post("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Widget\", "))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(post_json(json!({"name": "Widget", "price": "cheap"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(repo.is_empty());
}

#[tokio::test]
async fn non_json_body_is_unsupported_media_type() {
    let (app, _) = app();
    let req = Request::post("/api/products")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("Widget"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

struct FailingRepository;

#[async_trait]
impl ProductRepository for FailingRepository {
    async fn fetch_all(&self) -> Result<Vec<Product>, AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn insert(&self, _product: NewProduct) -> Result<Product, AppError> {
        Err(AppError::Db(sqlx::Error::Protocol("secret detail".into())))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Db(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn storage_failures_are_generic_server_errors() {
    let app = app_with(Arc::new(FailingRepository), RateLimitConfig::default());

    let resp = app.clone().oneshot(get_products()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = app
        .clone()
        .oneshot(post_json(json!({"name": "Widget", "price": 9.99})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "database_error");
    assert!(!body.to_string().contains("secret detail"));

    let resp = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn validation_failure_never_reaches_storage() {
    let app = app_with(Arc::new(FailingRepository), RateLimitConfig::default());
    let resp = app
        .oneshot(post_json(json!({"name": "W", "price": 9.99})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

fn from_client(mut req: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    req
}

#[tokio::test(start_paused = true)]
async fn eleventh_request_from_same_ip_is_rate_limited() {
    let app = app_with(
        Arc::new(InMemoryProductRepository::new()),
        RateLimitConfig::default(),
    );
    for _ in 0..10 {
        let resp = app
            .clone()
            .oneshot(from_client(get_products(), [10, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = app
        .clone()
        .oneshot(from_client(get_products(), [10, 0, 0, 1]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let resp = app
        .clone()
        .oneshot(from_client(get_products(), [10, 0, 0, 2]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    tokio::time::advance(Duration::from_secs(10)).await;
    let resp = app
        .oneshot(from_client(get_products(), [10, 0, 0, 1]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test(start_paused = true)]
async fn requests_without_peer_address_share_one_partition() {
    let app = app_with(
        Arc::new(InMemoryProductRepository::new()),
        RateLimitConfig::default(),
    );
    for _ in 0..10 {
        let resp = app.clone().oneshot(get_products()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let resp = app.oneshot(get_products()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/products")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn allow_listed_origin_passes_cors() {
    let (app, _) = app();
    let resp = app
        .clone()
        .oneshot(preflight("https://front.lhtecnologia.net.br"))
        .await
        .unwrap();
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://front.lhtecnologia.net.br"
    );

    let req = Request::get("/api/products")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn unknown_origin_gets_no_cors_grant() {
    let (app, _) = app();
    let resp = app
        .clone()
        .oneshot(preflight("https://evil.example.com"))
        .await
        .unwrap();
    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());

    let req = Request::get("/api/products")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn update_and_delete_are_not_routed() {
    let (app, _) = app();
    for method in ["PUT", "DELETE", "PATCH"] {
        let req = Request::builder()
            .method(method)
            .uri("/api/products")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
    }
}

#[tokio::test]
async fn operational_routes_respond() {
    let (app, _) = app();
    let resp = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "ok");

    let resp = app
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["database"], "ok");

    let resp = app
        .oneshot(Request::get("/version").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(resp).await["name"], "product-api");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = app();
    let resp = app
        .oneshot(
            Request::get("/swagger/v1/swagger.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = json_body(resp).await;
    assert_eq!(doc["info"]["title"], "LH Tecnologia API");
    assert!(doc["paths"]["/api/products"]["post"].is_object());
}
