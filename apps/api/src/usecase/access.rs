//! プロジェクトの閲覧権限チェック

use std::sync::Arc;

use zeno_domain::{
    access::{Permission, authorize},
    project::ProjectId,
    user::UserId,
};
use zeno_infra::repository::ProjectRepository;

use crate::error::ApiError;

/// プロジェクトの閲覧権限チェック
///
/// 存在しないプロジェクトは権限の有無にかかわらず 404 とする。
#[derive(Clone)]
pub struct ProjectAccessChecker {
    project_repository: Arc<dyn ProjectRepository>,
}

impl ProjectAccessChecker {
    pub fn new(project_repository: Arc<dyn ProjectRepository>) -> Self {
        Self { project_repository }
    }

    /// 閲覧者がプロジェクトを読めるか判定する
    ///
    /// 共有情報は所有者以外の識別済みユーザーについてのみ問い合わせる。
    pub async fn check_project(
        &self,
        project: &ProjectId,
        viewer: Option<UserId>,
    ) -> Result<Permission, ApiError> {
        let access = self
            .project_repository
            .find_access(project)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Project が見つかりません: {project}")))?;

        let membership = match viewer {
            Some(user) if user != access.owner_id => {
                self.project_repository.find_membership(project, user).await?
            }
            _ => None,
        };

        Ok(authorize(access.public, access.owner_id, viewer, membership)?)
    }
}
