//! プロジェクトのカラム・モデル一覧ユースケース

use std::sync::Arc;

use zeno_domain::{column::ZenoColumn, project::ProjectId, user::UserId};
use zeno_infra::repository::ColumnRepository;

use super::ProjectAccessChecker;
use crate::error::ApiError;

/// プロジェクトのメタデータ取得ユースケース
pub struct ProjectUseCaseImpl {
    access:            ProjectAccessChecker,
    column_repository: Arc<dyn ColumnRepository>,
}

impl ProjectUseCaseImpl {
    pub fn new(access: ProjectAccessChecker, column_repository: Arc<dyn ColumnRepository>) -> Self {
        Self {
            access,
            column_repository,
        }
    }

    /// プロジェクトの全カラムを名前順で返す
    pub async fn list_columns(
        &self,
        project_uuid: &str,
        viewer: Option<UserId>,
    ) -> Result<Vec<ZenoColumn>, ApiError> {
        let project = ProjectId::resolve(project_uuid)?;
        self.access.check_project(&project, viewer).await?;

        let columns = self.column_repository.find_all(&project).await?;
        Ok(columns.into_vec())
    }

    /// プロジェクトに出力を持つモデル名を重複なしで返す
    pub async fn list_models(
        &self,
        project_uuid: &str,
        viewer: Option<UserId>,
    ) -> Result<Vec<String>, ApiError> {
        let project = ProjectId::resolve(project_uuid)?;
        self.access.check_project(&project, viewer).await?;

        Ok(self.column_repository.find_models(&project).await?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::{CLASSIFICATION_PROJECT, PRIVATE_PROJECT, TestRepositories};

    fn sut(repos: &TestRepositories) -> ProjectUseCaseImpl {
        ProjectUseCaseImpl::new(
            ProjectAccessChecker::new(Arc::new(repos.projects.clone())),
            Arc::new(repos.columns.clone()),
        )
    }

    #[tokio::test]
    async fn test_カラム一覧が名前順で返る() {
        let repos = TestRepositories::with_projects();

        let columns = sut(&repos)
            .list_columns(CLASSIFICATION_PROJECT, None)
            .await
            .unwrap();

        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["correct", "correct", "data", "id", "label", "length", "output", "output"]
        );
    }

    #[tokio::test]
    async fn test_モデル一覧が重複なしで返る() {
        let repos = TestRepositories::with_projects();

        let models = sut(&repos)
            .list_models(CLASSIFICATION_PROJECT, None)
            .await
            .unwrap();

        assert_eq!(models, vec!["bert".to_string(), "gpt2".to_string()]);
    }

    #[tokio::test]
    async fn test_不正なuuidのプロジェクトは404になる() {
        let repos = TestRepositories::with_projects();

        let result = sut(&repos).list_columns("not-a-uuid", None).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_非公開プロジェクトのモデル一覧は匿名だと401になる() {
        let repos = TestRepositories::with_projects();

        let result = sut(&repos).list_models(PRIVATE_PROJECT, None).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }
}
