//! 統合テスト用ヘルパー
//!
//! 本番と同じルーター（`build_app`）をモックリポジトリで組み立て、
//! リクエストを 1 件ずつ流す。

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use zeno_api::{
    app_builder::{build_app, cors_layer},
    identity::USER_ID_HEADER,
    test_utils::TestRepositories,
};
use zeno_domain::user::UserId;

/// テスト用アプリケーションを構築する
pub fn create_test_app(repos: &TestRepositories) -> Router {
    build_app(repos.repositories(), cors_layer(None).unwrap())
}

/// JSON ボディの POST リクエスト
pub fn post_json(uri: &str, body: JsonValue, viewer: Option<UserId>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(viewer) = viewer {
        builder = builder.header(USER_ID_HEADER, viewer.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// GET リクエスト
pub fn get(uri: &str, viewer: Option<UserId>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(viewer) = viewer {
        builder = builder.header(USER_ID_HEADER, viewer.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

/// リクエストを送り、ステータスと JSON ボディを返す
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
