//! グループメトリクス集計ユースケース

use std::sync::Arc;

use zeno_domain::{
    metric::{GroupMetric, GroupMetricRequest, MetricQuery},
    project::ProjectId,
    user::UserId,
};
use zeno_infra::repository::{ColumnRepository, TableRepository};

use super::ProjectAccessChecker;
use crate::error::ApiError;

/// グループメトリクス集計ユースケース
pub struct MetricUseCaseImpl {
    access:            ProjectAccessChecker,
    column_repository: Arc<dyn ColumnRepository>,
    table_repository:  Arc<dyn TableRepository>,
}

impl MetricUseCaseImpl {
    pub fn new(
        access: ProjectAccessChecker,
        column_repository: Arc<dyn ColumnRepository>,
        table_repository: Arc<dyn TableRepository>,
    ) -> Self {
        Self {
            access,
            column_repository,
            table_repository,
        }
    }

    /// フィルタに一致する行数と、指定カラムの平均値を集計する
    pub async fn group_metric(
        &self,
        project_uuid: &str,
        viewer: Option<UserId>,
        request: GroupMetricRequest,
    ) -> Result<GroupMetric, ApiError> {
        let project = ProjectId::resolve(project_uuid)?;
        self.access.check_project(&project, viewer).await?;

        let columns = self.column_repository.find_all(&project).await?;
        let query = MetricQuery::from_request(&request, &columns)?;

        Ok(self.table_repository.group_metric(&project, &query).await?)
    }
}
