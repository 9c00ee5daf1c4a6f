//! # SliceRepository
//!
//! 保存済みスライスを読み取るリポジトリ。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{
    filter::FilterPredicateGroup,
    slice::{Slice, SliceId},
};

use crate::error::InfraError;

/// スライスリポジトリトレイト
#[async_trait]
pub trait SliceRepository: Send + Sync {
    /// ID でスライスを検索する
    async fn find_by_id(&self, id: SliceId) -> Result<Option<Slice>, InfraError>;
}

/// PostgreSQL 実装の SliceRepository
#[derive(Debug, Clone)]
pub struct PostgresSliceRepository {
    pool: PgPool,
}

impl PostgresSliceRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SliceRow {
    id:           i32,
    name:         String,
    folder_id:    Option<i32>,
    filter:       String,
    project_uuid: Option<String>,
}

#[async_trait]
impl SliceRepository for PostgresSliceRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: SliceId) -> Result<Option<Slice>, InfraError> {
        let row = sqlx::query_as::<_, SliceRow>(
            r#"
            SELECT id, name, folder_id, filter::text AS filter, project_uuid::text AS project_uuid
            FROM slices
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stored: serde_json::Value = serde_json::from_str(&row.filter)?;
        Ok(Some(Slice {
            id:                SliceId::new(row.id),
            slice_name:        row.name,
            folder_id:         row.folder_id,
            filter_predicates: FilterPredicateGroup::from_stored(&stored)?,
            project_uuid:      row.project_uuid,
        }))
    }
}
