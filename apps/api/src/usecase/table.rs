//! # テーブル取得ユースケース
//!
//! プロジェクトのデータテーブルをページ単位で取得する。
//!
//! | 入口 | フィルタ | 取得 |
//! |------|---------|------|
//! | フィルタ付き | リクエストの条件 + データ ID | 通常モード / 物体検出モード |
//! | スライス | スライスの条件 | 全カラム |
//! | タグ | タグのデータ ID | 全カラム |

use std::sync::Arc;

use zeno_domain::{
    filter::table_filter,
    frame::DataFrame,
    project::ProjectId,
    slice::SliceId,
    table::{
        DetectionColumns,
        DetectionQuery,
        SliceTableRequest,
        TableQuery,
        TableRequest,
        TagTableRequest,
        request_filter,
    },
    tag::TagId,
    user::UserId,
};
use zeno_infra::repository::{ColumnRepository, SliceRepository, TableRepository, TagRepository};

use super::ProjectAccessChecker;
use crate::error::ApiError;

/// テーブル取得ユースケース
pub struct TableUseCaseImpl {
    access:            ProjectAccessChecker,
    column_repository: Arc<dyn ColumnRepository>,
    slice_repository:  Arc<dyn SliceRepository>,
    tag_repository:    Arc<dyn TagRepository>,
    table_repository:  Arc<dyn TableRepository>,
}

impl TableUseCaseImpl {
    pub fn new(
        access: ProjectAccessChecker,
        column_repository: Arc<dyn ColumnRepository>,
        slice_repository: Arc<dyn SliceRepository>,
        tag_repository: Arc<dyn TagRepository>,
        table_repository: Arc<dyn TableRepository>,
    ) -> Self {
        Self {
            access,
            column_repository,
            slice_repository,
            tag_repository,
            table_repository,
        }
    }

    /// フィルタ付きテーブルを取得する
    ///
    /// 1. プロジェクトの解決と閲覧権限チェック
    /// 2. カラムを読み込み、フィルタ条件とデータ ID をカラムに対して解決
    /// 3. `d_conf` カラムがあれば物体検出モード、なければ通常モードで取得
    pub async fn filtered_table(
        &self,
        project_uuid: &str,
        viewer: Option<UserId>,
        request: TableRequest,
    ) -> Result<DataFrame, ApiError> {
        let project = ProjectId::resolve(project_uuid)?;
        self.access.check_project(&project, viewer).await?;

        let columns = self.column_repository.find_all(&project).await?;
        let filter = request_filter(&request, &columns)?;

        match DetectionColumns::detect(&columns, request.model.as_deref())? {
            Some(detection) => {
                let query = DetectionQuery {
                    columns: detection,
                    filter,
                    group_by_data: request.group_by_data(),
                    page: request.page()?,
                };
                Ok(self
                    .table_repository
                    .fetch_detection_page(&project, &query)
                    .await?)
            }
            None => {
                let query = TableQuery::from_request(&request, &columns, filter)?;
                Ok(self.table_repository.fetch_page(&project, &query).await?)
            }
        }
    }

    /// スライスの条件に一致する行を取得する
    pub async fn slice_table(
        &self,
        viewer: Option<UserId>,
        request: SliceTableRequest,
    ) -> Result<DataFrame, ApiError> {
        let page = request.page()?;
        let slice = self
            .slice_repository
            .find_by_id(request.slice_id)
            .await?
            .ok_or_else(|| slice_not_found(request.slice_id))?;

        let project = owning_project(slice.project_uuid.as_deref())
            .ok_or_else(|| slice_not_found(request.slice_id))?;
        self.access.check_project(&project, viewer).await?;

        let columns = self.column_repository.find_all(&project).await?;
        let filter = table_filter(
            &columns,
            request.model.as_deref(),
            Some(&slice.filter_predicates),
            None,
        )?;

        Ok(self
            .table_repository
            .fetch_filtered(&project, &filter, page)
            .await?)
    }

    /// タグ付けされた行を取得する
    ///
    /// データ ID が 1 件もないタグは空のテーブルになる。
    pub async fn tag_table(
        &self,
        viewer: Option<UserId>,
        request: TagTableRequest,
    ) -> Result<DataFrame, ApiError> {
        let page = request.page()?;
        let tag = self
            .tag_repository
            .find_by_id(request.tag_id)
            .await?
            .ok_or_else(|| tag_not_found(request.tag_id))?;

        let project = owning_project(tag.project_uuid.as_deref())
            .ok_or_else(|| tag_not_found(request.tag_id))?;
        self.access.check_project(&project, viewer).await?;

        let columns = self.column_repository.find_all(&project).await?;
        let filter = table_filter(
            &columns,
            request.model.as_deref(),
            None,
            Some(&tag.data_ids),
        )?;

        Ok(self
            .table_repository
            .fetch_filtered(&project, &filter, page)
            .await?)
    }
}

/// スライス・タグが属するプロジェクト
///
/// 未設定または UUID として解釈できない場合は `None`。
fn owning_project(project_uuid: Option<&str>) -> Option<ProjectId> {
    project_uuid.and_then(|raw| ProjectId::resolve(raw).ok())
}

fn slice_not_found(id: SliceId) -> ApiError {
    ApiError::NotFound(format!("Slice が見つかりません: {id}"))
}

fn tag_not_found(id: TagId) -> ApiError {
    ApiError::NotFound(format!("Tag が見つかりません: {id}"))
}
