//! # グループメトリクスハンドラ
//!
//! - `POST /api/group-metric/{project_uuid}` - 絞り込んだデータ群の件数と平均値

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use zeno_domain::metric::{GroupMetric, GroupMetricRequest};

use crate::{error::ApiError, identity::Viewer, usecase::MetricUseCaseImpl};

/// メトリクス API の共有状態
pub struct MetricState {
    pub usecase: MetricUseCaseImpl,
}

/// グループメトリクスを集計する
#[tracing::instrument(skip_all, fields(%project_uuid))]
pub async fn group_metric(
    State(state): State<Arc<MetricState>>,
    Path(project_uuid): Path<String>,
    Viewer(viewer): Viewer,
    Json(request): Json<GroupMetricRequest>,
) -> Result<Json<GroupMetric>, ApiError> {
    let metric = state
        .usecase
        .group_metric(&project_uuid, viewer, request)
        .await?;
    Ok(Json(metric))
}
