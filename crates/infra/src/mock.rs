//! # テスト用モックリポジトリ
//!
//! ユースケーステストとハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! zeno-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! `MockTableRepository` は受け取ったクエリを記録するため、
//! ユースケースが組み立てたフィルタやページ指定をテストから検証できる。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use itertools::Itertools;
use zeno_domain::{
    access::Membership,
    column::{ProjectColumns, ZenoColumn},
    filter::TableFilter,
    frame::DataFrame,
    metric::{GroupMetric, MetricQuery},
    project::ProjectId,
    report::{ReportElement, ReportId, StoredReport},
    slice::{Slice, SliceId},
    table::{DetectionQuery, Page, TableQuery},
    tag::{Tag, TagId},
    user::UserId,
};

use crate::{
    db::DatabaseProbe,
    error::InfraError,
    repository::{
        ColumnRepository,
        ProjectAccess,
        ProjectRepository,
        ReportRepository,
        SliceRepository,
        TableRepository,
        TagRepository,
    },
};

// ===== MockProjectRepository =====

#[derive(Clone, Default)]
pub struct MockProjectRepository {
    projects:    Arc<Mutex<HashMap<ProjectId, ProjectAccess>>>,
    memberships: Arc<Mutex<HashMap<(ProjectId, UserId), Membership>>>,
}

impl MockProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(&self, project: ProjectId, access: ProjectAccess) {
        self.projects.lock().unwrap().insert(project, access);
    }

    pub fn add_membership(&self, project: ProjectId, user: UserId, membership: Membership) {
        self.memberships
            .lock()
            .unwrap()
            .insert((project, user), membership);
    }
}

#[async_trait]
impl ProjectRepository for MockProjectRepository {
    async fn find_access(&self, project: &ProjectId) -> Result<Option<ProjectAccess>, InfraError> {
        Ok(self.projects.lock().unwrap().get(project).copied())
    }

    async fn find_membership(
        &self,
        project: &ProjectId,
        user: UserId,
    ) -> Result<Option<Membership>, InfraError> {
        Ok(self
            .memberships
            .lock()
            .unwrap()
            .get(&(*project, user))
            .copied())
    }
}

// ===== MockColumnRepository =====

#[derive(Clone, Default)]
pub struct MockColumnRepository {
    columns: Arc<Mutex<HashMap<ProjectId, Vec<ZenoColumn>>>>,
}

impl MockColumnRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_columns(&self, project: ProjectId, columns: Vec<ZenoColumn>) {
        self.columns.lock().unwrap().insert(project, columns);
    }
}

#[async_trait]
impl ColumnRepository for MockColumnRepository {
    async fn find_all(&self, project: &ProjectId) -> Result<ProjectColumns, InfraError> {
        Ok(self
            .columns
            .lock()
            .unwrap()
            .get(project)
            .map(|columns| {
                columns
                    .iter()
                    .sorted_by(|a, b| a.name.cmp(&b.name))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_models(&self, project: &ProjectId) -> Result<Vec<String>, InfraError> {
        Ok(self
            .columns
            .lock()
            .unwrap()
            .get(project)
            .map(|columns| {
                columns
                    .iter()
                    .filter_map(|c| c.model.clone())
                    .sorted()
                    .dedup()
                    .collect()
            })
            .unwrap_or_default())
    }
}

// ===== MockSliceRepository =====

#[derive(Clone, Default)]
pub struct MockSliceRepository {
    slices: Arc<Mutex<Vec<Slice>>>,
}

impl MockSliceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_slice(&self, slice: Slice) {
        self.slices.lock().unwrap().push(slice);
    }
}

#[async_trait]
impl SliceRepository for MockSliceRepository {
    async fn find_by_id(&self, id: SliceId) -> Result<Option<Slice>, InfraError> {
        Ok(self
            .slices
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }
}

// ===== MockTagRepository =====

#[derive(Clone, Default)]
pub struct MockTagRepository {
    tags: Arc<Mutex<Vec<Tag>>>,
}

impl MockTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tag(&self, tag: Tag) {
        self.tags.lock().unwrap().push(tag);
    }
}

#[async_trait]
impl TagRepository for MockTagRepository {
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, InfraError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }
}

// ===== MockReportRepository =====

#[derive(Clone, Default)]
pub struct MockReportRepository {
    reports:     Arc<Mutex<Vec<StoredReport>>>,
    memberships: Arc<Mutex<HashMap<(ReportId, UserId), Membership>>>,
    elements:    Arc<Mutex<HashMap<ReportId, Vec<ReportElement>>>>,
}

impl MockReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_report(&self, report: StoredReport) {
        self.reports.lock().unwrap().push(report);
    }

    pub fn add_membership(&self, report: ReportId, user: UserId, membership: Membership) {
        self.memberships
            .lock()
            .unwrap()
            .insert((report, user), membership);
    }

    pub fn add_elements(&self, report: ReportId, elements: Vec<ReportElement>) {
        self.elements.lock().unwrap().insert(report, elements);
    }
}

#[async_trait]
impl ReportRepository for MockReportRepository {
    async fn find_by_id(&self, id: ReportId) -> Result<Option<StoredReport>, InfraError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_membership(&self, id: ReportId, user: UserId) -> Result<Option<Membership>, InfraError> {
        Ok(self.memberships.lock().unwrap().get(&(id, user)).copied())
    }

    async fn find_elements(&self, id: ReportId) -> Result<Vec<ReportElement>, InfraError> {
        let mut elements = self
            .elements
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default();
        elements.sort_by_key(|e| e.position);
        Ok(elements)
    }
}

// ===== MockTableRepository =====

/// 固定のテーブルを返し、受け取ったクエリを記録するモック
#[derive(Clone, Default)]
pub struct MockTableRepository {
    frames:            Arc<Mutex<HashMap<ProjectId, DataFrame>>>,
    detection_frames:  Arc<Mutex<HashMap<ProjectId, DataFrame>>>,
    metrics:           Arc<Mutex<HashMap<ProjectId, GroupMetric>>>,
    page_queries:      Arc<Mutex<Vec<(ProjectId, TableQuery)>>>,
    detection_queries: Arc<Mutex<Vec<(ProjectId, DetectionQuery)>>>,
    filtered_queries:  Arc<Mutex<Vec<(ProjectId, TableFilter, Page)>>>,
    metric_queries:    Arc<Mutex<Vec<(ProjectId, MetricQuery)>>>,
}

impl MockTableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 通常モードとフィルタのみの取得で返すテーブルを設定する
    pub fn set_frame(&self, project: ProjectId, frame: DataFrame) {
        self.frames.lock().unwrap().insert(project, frame);
    }

    /// 物体検出モードで返すテーブルを設定する
    pub fn set_detection_frame(&self, project: ProjectId, frame: DataFrame) {
        self.detection_frames.lock().unwrap().insert(project, frame);
    }

    pub fn set_metric(&self, project: ProjectId, metric: GroupMetric) {
        self.metrics.lock().unwrap().insert(project, metric);
    }

    pub fn page_queries(&self) -> Vec<(ProjectId, TableQuery)> {
        self.page_queries.lock().unwrap().clone()
    }

    pub fn detection_queries(&self) -> Vec<(ProjectId, DetectionQuery)> {
        self.detection_queries.lock().unwrap().clone()
    }

    pub fn filtered_queries(&self) -> Vec<(ProjectId, TableFilter, Page)> {
        self.filtered_queries.lock().unwrap().clone()
    }

    pub fn metric_queries(&self) -> Vec<(ProjectId, MetricQuery)> {
        self.metric_queries.lock().unwrap().clone()
    }

    fn frame_for(&self, project: &ProjectId) -> DataFrame {
        self.frames
            .lock()
            .unwrap()
            .get(project)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl TableRepository for MockTableRepository {
    async fn fetch_page(&self, project: &ProjectId, query: &TableQuery) -> Result<DataFrame, InfraError> {
        self.page_queries
            .lock()
            .unwrap()
            .push((*project, query.clone()));
        Ok(self.frame_for(project))
    }

    async fn fetch_detection_page(
        &self,
        project: &ProjectId,
        query: &DetectionQuery,
    ) -> Result<DataFrame, InfraError> {
        self.detection_queries
            .lock()
            .unwrap()
            .push((*project, query.clone()));
        Ok(self
            .detection_frames
            .lock()
            .unwrap()
            .get(project)
            .cloned()
            .unwrap_or_else(|| DataFrame::new(query.columns.record_columns())))
    }

    async fn fetch_filtered(
        &self,
        project: &ProjectId,
        filter: &TableFilter,
        page: Page,
    ) -> Result<DataFrame, InfraError> {
        self.filtered_queries
            .lock()
            .unwrap()
            .push((*project, filter.clone(), page));
        Ok(self.frame_for(project))
    }

    async fn group_metric(&self, project: &ProjectId, query: &MetricQuery) -> Result<GroupMetric, InfraError> {
        self.metric_queries
            .lock()
            .unwrap()
            .push((*project, query.clone()));
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .get(project)
            .cloned()
            .unwrap_or(GroupMetric { metric: None, size: 0 }))
    }
}

// ===== MockDatabaseProbe =====

/// 疎通結果を固定で返すモック
#[derive(Clone)]
pub struct MockDatabaseProbe {
    healthy: bool,
}

impl MockDatabaseProbe {
    pub fn healthy() -> Self {
        Self { healthy: true }
    }

    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl DatabaseProbe for MockDatabaseProbe {
    async fn ping(&self) -> Result<(), InfraError> {
        if self.healthy {
            Ok(())
        } else {
            Err(InfraError::unexpected("データベースに接続できません"))
        }
    }
}
