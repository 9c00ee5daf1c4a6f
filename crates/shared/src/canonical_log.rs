//! # Canonical Log Line ミドルウェア
//!
//! HTTP リクエスト完了時に、そのリクエストの重要情報を1行に集約した
//! サマリログ（Canonical Log Line）を出力する tower Layer。
//!
//! ## TraceLayer との責務分離
//!
//! - TraceLayer: スパン作成（method, uri）。リクエストスコープのコンテキスト管理
//! - CanonicalLogLineLayer: リクエスト完了サマリ（status, latency）
//!
//! TraceLayer のスパン内に配置するため、スパンフィールドが JSON ログに含まれる。

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use http::{Request, Response};
use tower::{Layer, Service};

/// サマリログを出さない死活監視パス
///
/// `/ping` と `/health/*` はロードバランサーから高頻度で叩かれる。
fn is_probe_path(path: &str) -> bool {
    path == "/ping" || path.starts_with("/health")
}

/// リクエスト完了時のサマリを出力する
fn emit_summary<T, E: std::fmt::Display>(result: &Result<Response<T>, E>, started: Instant) {
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match result {
        Ok(response) => tracing::info!(
            log.r#type = "canonical",
            http.status_code = response.status().as_u16(),
            http.latency_ms = latency_ms,
            "リクエスト完了"
        ),
        Err(err) => tracing::error!(
            log.r#type = "canonical",
            http.latency_ms = latency_ms,
            error.message = %err,
            "リクエスト処理エラー"
        ),
    }
}

/// Canonical Log Line を出力する Layer
///
/// リクエスト完了時に INFO レベルで `log.type = "canonical"` マーカー付きの
/// サマリログを出力する。死活監視パスは出力対象外。
///
/// ## レイヤー配置
///
/// TraceLayer の内側に配置し、スパンフィールドを活用する:
///
/// ```text
/// TraceLayer → CanonicalLogLineLayer → [他のミドルウェア] → handler
/// ```
#[derive(Clone, Debug)]
pub struct CanonicalLogLineLayer;

impl<S> Layer<S> for CanonicalLogLineLayer {
    type Service = CanonicalLogLineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CanonicalLogLineService { inner }
    }
}

/// Canonical Log Line を出力する Service
///
/// [`CanonicalLogLineLayer`] が生成する Service 実装。
#[derive(Clone, Debug)]
pub struct CanonicalLogLineService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CanonicalLogLineService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // poll_ready 済みの inner を取り出し、代わりに clone を残す
        let ready = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, ready);

        if is_probe_path(req.uri().path()) {
            return Box::pin(inner.call(req));
        }

        let started = Instant::now();
        Box::pin(async move {
            let result = inner.call(req).await;
            emit_summary(&result, started);
            result
        })
    }
}
