//! # テーブルハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/filtered-table/{project_uuid}` - フィルタ付きテーブル取得
//! - `POST /api/slice-table` - スライスのテーブル取得
//! - `POST /api/tag-table` - タグのテーブル取得
//!
//! いずれもレコードの配列（`[{カラム: 値, ...}, ...]`）を返す。

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use zeno_domain::{
    frame::DataFrame,
    table::{SliceTableRequest, TableRequest, TagTableRequest},
};

use crate::{error::ApiError, identity::Viewer, usecase::TableUseCaseImpl};

/// テーブル API の共有状態
pub struct TableState {
    pub usecase: TableUseCaseImpl,
}

/// フィルタ付きテーブルを取得する
#[tracing::instrument(skip_all, fields(%project_uuid))]
pub async fn filtered_table(
    State(state): State<Arc<TableState>>,
    Path(project_uuid): Path<String>,
    Viewer(viewer): Viewer,
    Json(request): Json<TableRequest>,
) -> Result<Json<DataFrame>, ApiError> {
    let frame = state
        .usecase
        .filtered_table(&project_uuid, viewer, request)
        .await?;
    Ok(Json(frame))
}

/// スライスのテーブルを取得する
#[tracing::instrument(skip_all)]
pub async fn slice_table(
    State(state): State<Arc<TableState>>,
    Viewer(viewer): Viewer,
    Json(request): Json<SliceTableRequest>,
) -> Result<Json<DataFrame>, ApiError> {
    let frame = state.usecase.slice_table(viewer, request).await?;
    Ok(Json(frame))
}

/// タグのテーブルを取得する
#[tracing::instrument(skip_all)]
pub async fn tag_table(
    State(state): State<Arc<TableState>>,
    Viewer(viewer): Viewer,
    Json(request): Json<TagTableRequest>,
) -> Result<Json<DataFrame>, ApiError> {
    let frame = state.usecase.tag_table(viewer, request).await?;
    Ok(Json(frame))
}
