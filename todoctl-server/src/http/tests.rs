use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::build_router;
use crate::service::testing::service;

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let (service, _) = service();
        Self {
            router: build_router(service, false),
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn token_for(&self, username: &str) -> String {
        let (status, _) = self
            .call(
                Method::POST,
                "/auth/sign-up",
                None,
                Some(json!({"name": username, "username": username, "password": "pw"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .call(
                Method::POST,
                "/auth/sign-in",
                None,
                Some(json!({"username": username, "password": "pw"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn api_requires_bearer_token() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/lists", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app
        .call(Method::GET, "/api/lists", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn sign_in_rejects_unknown_user_and_wrong_password() {
    let app = TestApp::new();
    app.token_for("ada").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({"username": "ada", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(
            Method::POST,
            "/auth/sign-in",
            None,
            Some(json!({"username": "nobody", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_sign_up_is_conflict() {
    let app = TestApp::new();
    app.token_for("ada").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/auth/sign-up",
            None,
            Some(json!({"name": "Ada", "username": "ada", "password": "pw"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn groceries_and_milk_over_http() {
    let app = TestApp::new();
    let a = app.token_for("a").await;
    let b = app.token_for("b").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/lists",
            Some(&a),
            Some(json!({"title": "Groceries"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let list_id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .call(Method::GET, &format!("/api/lists/{}", list_id), Some(&b), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/lists/{}/items", list_id),
            Some(&a),
            Some(json!({"title": "Milk"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/lists/{}/items", list_id),
            Some(&a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "Milk");
    assert_eq!(body["data"][0]["done"], false);

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/items/{}", item_id),
            Some(&a),
            Some(json!({"done": true})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, body) = app
        .call(Method::GET, &format!("/api/items/{}", item_id), Some(&a), None)
        .await;
    assert_eq!(body["done"], true);
    assert_eq!(body["title"], "Milk");

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/items/{}", item_id),
            Some(&b),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/items/{}", item_id),
            Some(&a),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::GET, &format!("/api/items/{}", item_id), Some(&a), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_update_is_400() {
    let app = TestApp::new();
    let a = app.token_for("a").await;

    let (status, body) = app
        .call(Method::PUT, "/api/lists/1", Some(&a), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn empty_collection_is_empty_data() {
    let app = TestApp::new();
    let a = app.token_for("a").await;

    let (status, body) = app.call(Method::GET, "/api/lists", Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));
}
