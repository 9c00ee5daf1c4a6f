//! # ColumnRepository
//!
//! プロジェクトの column map（カラム定義）を読み取るリポジトリ。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{
    column::{MetadataType, ProjectColumns, ZenoColumn, ZenoColumnType},
    project::ProjectId,
};

use crate::{error::InfraError, sql::quote_ident};

/// カラムリポジトリトレイト
#[async_trait]
pub trait ColumnRepository: Send + Sync {
    /// プロジェクトの全カラムを表示名順で取得する
    async fn find_all(&self, project: &ProjectId) -> Result<ProjectColumns, InfraError>;

    /// プロジェクトに出力を登録したモデル名を昇順で取得する
    async fn find_models(&self, project: &ProjectId) -> Result<Vec<String>, InfraError>;
}

/// PostgreSQL 実装の ColumnRepository
#[derive(Debug, Clone)]
pub struct PostgresColumnRepository {
    pool: PgPool,
}

impl PostgresColumnRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    column_id:   String,
    name:        String,
    column_type: String,
    model:       Option<String>,
    data_type:   String,
}

impl TryFrom<ColumnRow> for ZenoColumn {
    type Error = InfraError;

    fn try_from(row: ColumnRow) -> Result<Self, Self::Error> {
        let column_type: ZenoColumnType = row.column_type.parse().map_err(|_| {
            InfraError::invalid_data(format!("不正なカラム種別: {}", row.column_type))
        })?;
        let data_type: MetadataType = row.data_type.parse().map_err(|_| {
            InfraError::invalid_data(format!("不正なデータ型: {}", row.data_type))
        })?;
        Ok(ZenoColumn::new(
            row.column_id,
            row.name,
            column_type,
            data_type,
            row.model,
        ))
    }
}

#[async_trait]
impl ColumnRepository for PostgresColumnRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%project))]
    async fn find_all(&self, project: &ProjectId) -> Result<ProjectColumns, InfraError> {
        let sql = format!(
            "SELECT column_id::text AS column_id, name, type AS column_type, model, data_type FROM {} ORDER BY name",
            quote_ident(&project.column_map_table())
        );
        let rows = sqlx::query_as::<_, ColumnRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(ZenoColumn::try_from)
            .collect::<Result<ProjectColumns, _>>()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%project))]
    async fn find_models(&self, project: &ProjectId) -> Result<Vec<String>, InfraError> {
        let sql = format!(
            "SELECT DISTINCT model FROM {} WHERE model IS NOT NULL ORDER BY model",
            quote_ident(&project.column_map_table())
        );
        let models = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(models)
    }
}
