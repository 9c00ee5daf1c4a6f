//! レポート取得ユースケース

use std::sync::Arc;

use zeno_domain::{
    access::authorize,
    report::{ReportId, ReportResponse},
    user::UserId,
};
use zeno_infra::repository::ReportRepository;

use crate::error::ApiError;

/// レポート取得ユースケース
pub struct ReportUseCaseImpl {
    report_repository: Arc<dyn ReportRepository>,
}

impl ReportUseCaseImpl {
    pub fn new(report_repository: Arc<dyn ReportRepository>) -> Self {
        Self { report_repository }
    }

    /// レポートと要素一覧を取得する
    ///
    /// 閲覧権限はプロジェクトと同じ規則で判定し、判定結果の編集可否を
    /// レスポンスの `editor` に反映する。
    pub async fn get_report(
        &self,
        id: ReportId,
        viewer: Option<UserId>,
    ) -> Result<ReportResponse, ApiError> {
        let stored = self
            .report_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Report が見つかりません: {id}")))?;

        let membership = match viewer {
            Some(user) if user != stored.owner_id => {
                self.report_repository.find_membership(id, user).await?
            }
            _ => None,
        };
        let permission = authorize(stored.public, stored.owner_id, viewer, membership)?;

        let report_elements = self.report_repository.find_elements(id).await?;

        Ok(ReportResponse {
            report: stored.into_report(permission.editor),
            report_elements,
        })
    }
}
