//! # ProjectRepository
//!
//! プロジェクトの公開設定と共有状況を読み取るリポジトリ。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{access::Membership, project::ProjectId, user::UserId};

use crate::error::InfraError;

/// アクセス判定に必要なプロジェクト情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectAccess {
    pub owner_id: UserId,
    pub public:   bool,
}

/// プロジェクトリポジトリトレイト
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// プロジェクトの所有者と公開設定を取得する
    ///
    /// プロジェクトが存在しない場合は `None`。
    async fn find_access(&self, project: &ProjectId) -> Result<Option<ProjectAccess>, InfraError>;

    /// ユーザーへの共有状況を取得する
    ///
    /// `user_project` と、ユーザーが所属する組織の `organization_project` を合わせて見る。
    /// どちらにも含まれない場合は `None`。
    async fn find_membership(
        &self,
        project: &ProjectId,
        user: UserId,
    ) -> Result<Option<Membership>, InfraError>;
}

/// PostgreSQL 実装の ProjectRepository
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccessRow {
    owner_id: i32,
    public:   Option<bool>,
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    links:  i64,
    editor: bool,
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%project))]
    async fn find_access(&self, project: &ProjectId) -> Result<Option<ProjectAccess>, InfraError> {
        let row = sqlx::query_as::<_, AccessRow>(
            r#"
            SELECT owner_id, public
            FROM projects
            WHERE uuid::text = $1
            "#,
        )
        .bind(project.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ProjectAccess {
            owner_id: UserId::new(row.owner_id),
            public:   row.public.unwrap_or(false),
        }))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%project, %user))]
    async fn find_membership(
        &self,
        project: &ProjectId,
        user: UserId,
    ) -> Result<Option<Membership>, InfraError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT COUNT(*) AS links, COALESCE(bool_or(editor), FALSE) AS editor
            FROM (
                SELECT up.editor
                FROM user_project AS up
                WHERE up.project_uuid::text = $1 AND up.user_id = $2
                UNION ALL
                SELECT op.editor
                FROM organization_project AS op
                JOIN user_organization AS uo ON op.organization_id = uo.organization_id
                WHERE op.project_uuid::text = $1 AND uo.user_id = $2
            ) AS shares
            "#,
        )
        .bind(project.to_string())
        .bind(user.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok((row.links > 0).then_some(Membership { editor: row.editor }))
    }
}
