//! # ヘルスチェックハンドラ
//!
//! - `/ping`: Liveness Check（常に `{"message": "Success!"}` を返す）
//! - `/health/ready`: Readiness Check（DB の接続状態を確認）

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use zeno_infra::db::DatabaseProbe;
use zeno_shared::{CheckStatus, PingResponse, ReadinessResponse};

/// Liveness Check エンドポイント
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::success())
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub database: Arc<dyn DatabaseProbe>,
}

/// Readiness Check エンドポイント
///
/// DB に疎通できれば 200、できなければ 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = HashMap::new();
    checks.insert(
        "database".to_string(),
        check_database(state.database.as_ref()).await,
    );

    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

/// DB への接続を確認する（タイムアウト: 5 秒）
async fn check_database(database: &dyn DatabaseProbe) -> CheckStatus {
    match tokio::time::timeout(Duration::from_secs(5), database.ping()).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}
