//! # ReportRepository
//!
//! レポートと要素、共有状況を読み取るリポジトリ。

use async_trait::async_trait;
use sqlx::PgPool;
use zeno_domain::{
    access::Membership,
    report::{ReportElement, ReportElementType, ReportId, StoredReport},
    user::UserId,
};

use crate::error::InfraError;

/// レポートリポジトリトレイト
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// ID でレポートを検索する
    ///
    /// 所有者の表示名と紐づくプロジェクトも合わせて取得する。
    async fn find_by_id(&self, id: ReportId) -> Result<Option<StoredReport>, InfraError>;

    /// ユーザーへの共有状況を取得する
    ///
    /// `user_report` と、ユーザーが所属する組織の `organization_report` を合わせて見る。
    async fn find_membership(&self, id: ReportId, user: UserId) -> Result<Option<Membership>, InfraError>;

    /// レポートの要素を表示順で取得する
    async fn find_elements(&self, id: ReportId) -> Result<Vec<ReportElement>, InfraError>;
}

/// PostgreSQL 実装の ReportRepository
#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id:         i32,
    name:       String,
    owner_id:   i32,
    public:     Option<bool>,
    owner_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    links:  i64,
    editor: bool,
}

#[derive(sqlx::FromRow)]
struct ElementRow {
    id:           i32,
    element_type: String,
    data:         Option<String>,
    position:     i32,
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: ReportId) -> Result<Option<StoredReport>, InfraError> {
        let row = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT r.id, r.name, r.owner_id, r.public, u.display_name AS owner_name
            FROM reports AS r
            LEFT JOIN users AS u ON r.owner_id = u.id
            WHERE r.id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let owner_name = row.owner_name.ok_or_else(|| {
            InfraError::invalid_data(format!("レポートの所有者が見つかりません: {}", row.owner_id))
        })?;

        let linked_projects = sqlx::query_scalar::<_, String>(
            r#"
            SELECT project_uuid::text
            FROM report_project
            WHERE report_id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(StoredReport {
            id: ReportId::new(row.id),
            name: row.name,
            owner_id: UserId::new(row.owner_id),
            owner_name,
            public: row.public.unwrap_or(false),
            linked_projects,
        }))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %user))]
    async fn find_membership(&self, id: ReportId, user: UserId) -> Result<Option<Membership>, InfraError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT COUNT(*) AS links, COALESCE(bool_or(editor), FALSE) AS editor
            FROM (
                SELECT ur.editor
                FROM user_report AS ur
                WHERE ur.report_id = $1 AND ur.user_id = $2
                UNION ALL
                SELECT orr.editor
                FROM organization_report AS orr
                JOIN user_organization AS uo ON orr.organization_id = uo.organization_id
                WHERE orr.report_id = $1 AND uo.user_id = $2
            ) AS shares
            "#,
        )
        .bind(id.as_i32())
        .bind(user.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok((row.links > 0).then_some(Membership { editor: row.editor }))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_elements(&self, id: ReportId) -> Result<Vec<ReportElement>, InfraError> {
        let rows = sqlx::query_as::<_, ElementRow>(
            r#"
            SELECT id, type AS element_type, data, position
            FROM report_elements
            WHERE report_id = $1
            ORDER BY position
            "#,
        )
        .bind(id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let element_type: ReportElementType = row.element_type.parse().map_err(|_| {
                    InfraError::invalid_data(format!("不正なレポート要素種別: {}", row.element_type))
                })?;
                Ok(ReportElement::new(
                    Some(row.id),
                    element_type,
                    row.position,
                    row.data,
                ))
            })
            .collect()
    }
}
