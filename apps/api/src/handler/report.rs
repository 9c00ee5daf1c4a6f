//! # レポートハンドラ
//!
//! - `GET /api/report/{report_id}` - レポートと要素一覧の取得

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use zeno_domain::report::{ReportId, ReportResponse};

use crate::{error::ApiError, identity::Viewer, usecase::ReportUseCaseImpl};

/// レポート API の共有状態
pub struct ReportState {
    pub usecase: ReportUseCaseImpl,
}

/// レポートを取得する
#[tracing::instrument(skip_all, fields(%report_id))]
pub async fn get_report(
    State(state): State<Arc<ReportState>>,
    Path(report_id): Path<i32>,
    Viewer(viewer): Viewer,
) -> Result<Json<ReportResponse>, ApiError> {
    let response = state
        .usecase
        .get_report(ReportId::new(report_id), viewer)
        .await?;
    Ok(Json(response))
}
