//! # TableRepository
//!
//! プロジェクトのデータテーブルからページ単位で行を取得するリポジトリ。
//!
//! SQL の組み立ては [`crate::sql`]、行のデコードは [`crate::row`] が担当する。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{
    filter::TableFilter,
    frame::DataFrame,
    metric::{GroupMetric, MetricQuery},
    project::ProjectId,
    table::{DetectionQuery, Page, TableQuery},
};

use crate::{error::InfraError, row, sql};

/// テーブルリポジトリトレイト
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// 通常モードで 1 ページ分の行を取得する
    async fn fetch_page(&self, project: &ProjectId, query: &TableQuery) -> Result<DataFrame, InfraError>;

    /// 物体検出モードで 1 ページ分のレコードを取得する
    ///
    /// 結果のカラムは [`DetectionColumns::record_columns`](zeno_domain::table::DetectionColumns::record_columns) の 9 つ。
    async fn fetch_detection_page(
        &self,
        project: &ProjectId,
        query: &DetectionQuery,
    ) -> Result<DataFrame, InfraError>;

    /// フィルタだけを適用して 1 ページ分の行を取得する
    async fn fetch_filtered(
        &self,
        project: &ProjectId,
        filter: &TableFilter,
        page: Page,
    ) -> Result<DataFrame, InfraError>;

    /// フィルタで絞り込んだ行の件数と平均を集計する
    async fn group_metric(&self, project: &ProjectId, query: &MetricQuery) -> Result<GroupMetric, InfraError>;
}

/// PostgreSQL 実装の TableRepository
#[derive(Debug, Clone)]
pub struct PostgresTableRepository {
    pool: PgPool,
}

impl PostgresTableRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MetricRow {
    metric: Option<f64>,
    size:   i64,
}

#[async_trait]
impl TableRepository for PostgresTableRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%project, offset = query.page.offset(), limit = query.page.limit()))]
    async fn fetch_page(&self, project: &ProjectId, query: &TableQuery) -> Result<DataFrame, InfraError> {
        let mut qb = sql::table_page_query(project, query);
        let rows = qb.build().fetch_all(&self.pool).await?;

        row::rows_to_frame(&rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%project, group_by_data = query.group_by_data))]
    async fn fetch_detection_page(
        &self,
        project: &ProjectId,
        query: &DetectionQuery,
    ) -> Result<DataFrame, InfraError> {
        let mut qb = sql::detection_page_query(project, query);
        let rows = qb.build().fetch_all(&self.pool).await?;

        row::rows_to_frame_with(&rows, query.columns.record_columns())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%project, offset = page.offset(), limit = page.limit()))]
    async fn fetch_filtered(
        &self,
        project: &ProjectId,
        filter: &TableFilter,
        page: Page,
    ) -> Result<DataFrame, InfraError> {
        let mut qb = sql::filtered_page_query(project, filter, page);
        let rows = qb.build().fetch_all(&self.pool).await?;

        row::rows_to_frame(&rows)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%project))]
    async fn group_metric(&self, project: &ProjectId, query: &MetricQuery) -> Result<GroupMetric, InfraError> {
        let mut qb = sql::group_metric_query(project, query);
        let row: MetricRow = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(GroupMetric {
            metric: row.metric,
            size:   row.size,
        })
    }
}
