//! # TagRepository
//!
//! 保存済みタグと、タグに属するデータ ID を読み取るリポジトリ。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{
    project::ProjectId,
    tag::{Tag, TagId},
};

use crate::{error::InfraError, sql::quote_ident};

/// タグリポジトリトレイト
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// ID でタグを検索する
    ///
    /// データ ID はタグのプロジェクトの `{uuid}_tags_datapoints` から読む。
    /// プロジェクトが未設定または UUID として不正な場合、データ ID は空になる。
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, InfraError>;
}

/// PostgreSQL 実装の TagRepository
#[derive(Debug, Clone)]
pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id:           i32,
    name:         String,
    folder_id:    Option<i32>,
    project_uuid: Option<String>,
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, InfraError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT id, name, folder_id, project_uuid::text AS project_uuid
            FROM tags
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let project = row
            .project_uuid
            .as_deref()
            .and_then(|raw| ProjectId::resolve(raw).ok());
        let data_ids = match project {
            Some(project) => {
                let sql = format!(
                    "SELECT data_id::text FROM {} WHERE tag_id = $1",
                    quote_ident(&project.tags_datapoints_table())
                );
                sqlx::query_scalar::<_, String>(&sql)
                    .bind(row.id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => Vec::new(),
        };

        Ok(Some(Tag {
            id: TagId::new(row.id),
            tag_name: row.name,
            folder_id: row.folder_id,
            data_ids,
            project_uuid: row.project_uuid,
        }))
    }
}
