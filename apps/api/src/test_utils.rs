//! テスト用のリポジトリ一式とプロジェクトデータ
//!
//! ユースケーステスト・ハンドラテスト・統合テストで共通のセットアップを提供する。
//! モックはすべて `Arc` で内部状態を共有するため、[`TestRepositories::repositories`]
//! でアプリに渡した後もテストから登録内容を追加・検証できる。

use std::sync::Arc;

use zeno_domain::{
    column::{MetadataType, ZenoColumn, ZenoColumnType},
    project::ProjectId,
    user::UserId,
};
use zeno_infra::{
    mock::{
        MockColumnRepository,
        MockDatabaseProbe,
        MockProjectRepository,
        MockReportRepository,
        MockSliceRepository,
        MockTableRepository,
        MockTagRepository,
    },
    repository::ProjectAccess,
};

use crate::app_builder::Repositories;

/// 公開の分類プロジェクト
pub const CLASSIFICATION_PROJECT: &str = "0d1b6a4e-5f7c-4c1e-9a3b-2e8f6d4c1a01";
/// 公開の物体検出プロジェクト
pub const DETECTION_PROJECT: &str = "0d1b6a4e-5f7c-4c1e-9a3b-2e8f6d4c1a02";
/// 所有者だけが閲覧できる分類プロジェクト
pub const PRIVATE_PROJECT: &str = "0d1b6a4e-5f7c-4c1e-9a3b-2e8f6d4c1a03";

/// プロジェクトの所有者
pub const OWNER: UserId = UserId::new(1);
/// 共有されていないユーザー
pub const STRANGER: UserId = UserId::new(2);

/// テスト用文字列から ProjectId を作る
pub fn project_id(raw: &str) -> ProjectId {
    ProjectId::resolve(raw).unwrap()
}

/// モックリポジトリ一式
#[derive(Clone, Default)]
pub struct TestRepositories {
    pub projects: MockProjectRepository,
    pub columns:  MockColumnRepository,
    pub slices:   MockSliceRepository,
    pub tags:     MockTagRepository,
    pub reports:  MockReportRepository,
    pub tables:   MockTableRepository,
}

impl TestRepositories {
    /// 空のリポジトリ一式
    pub fn new() -> Self {
        Self::default()
    }

    /// 公開・非公開の分類プロジェクトと物体検出プロジェクトを登録済みのリポジトリ一式
    pub fn with_projects() -> Self {
        let repos = Self::new();
        repos.add_project(CLASSIFICATION_PROJECT, true, classification_columns());
        repos.add_project(DETECTION_PROJECT, true, detection_columns());
        repos.add_project(PRIVATE_PROJECT, false, classification_columns());
        repos
    }

    /// `OWNER` が所有するプロジェクトを登録する
    pub fn add_project(&self, raw: &str, public: bool, columns: Vec<ZenoColumn>) -> ProjectId {
        let id = project_id(raw);
        self.projects.add_project(
            id,
            ProjectAccess {
                owner_id: OWNER,
                public,
            },
        );
        self.columns.add_columns(id, columns);
        id
    }

    /// アプリに渡すリポジトリ一式（DB は常に疎通可能）
    pub fn repositories(&self) -> Repositories {
        Repositories {
            project:  Arc::new(self.projects.clone()),
            column:   Arc::new(self.columns.clone()),
            slice:    Arc::new(self.slices.clone()),
            tag:      Arc::new(self.tags.clone()),
            report:   Arc::new(self.reports.clone()),
            table:    Arc::new(self.tables.clone()),
            database: Arc::new(MockDatabaseProbe::healthy()),
        }
    }
}

fn column(id: &str, name: &str, column_type: ZenoColumnType, data_type: MetadataType) -> ZenoColumn {
    ZenoColumn::new(id, name, column_type, data_type, None)
}

fn model_column(
    id: &str,
    name: &str,
    column_type: ZenoColumnType,
    data_type: MetadataType,
    model: &str,
) -> ZenoColumn {
    ZenoColumn::new(id, name, column_type, data_type, Some(model.to_string()))
}

/// 2 モデル分の出力と正解フラグを持つ分類プロジェクトのカラム
pub fn classification_columns() -> Vec<ZenoColumn> {
    vec![
        column("0", "id", ZenoColumnType::Id, MetadataType::Other),
        column("1", "data", ZenoColumnType::Data, MetadataType::Other),
        column("2", "label", ZenoColumnType::Label, MetadataType::Nominal),
        column("3", "length", ZenoColumnType::Feature, MetadataType::Continuous),
        model_column("5", "output", ZenoColumnType::Output, MetadataType::Nominal, "gpt2"),
        model_column("6", "output", ZenoColumnType::Output, MetadataType::Nominal, "bert"),
        model_column("7", "correct", ZenoColumnType::Feature, MetadataType::Boolean, "gpt2"),
        model_column("8", "correct", ZenoColumnType::Feature, MetadataType::Boolean, "bert"),
    ]
}

/// 物体検出プロジェクトのカラム（`d_conf` 以降は 2 モデル分）
pub fn detection_columns() -> Vec<ZenoColumn> {
    let mut columns = vec![
        column("0", "id", ZenoColumnType::Id, MetadataType::Other),
        column("1", "data", ZenoColumnType::Data, MetadataType::Other),
        column("2", "label", ZenoColumnType::Label, MetadataType::Nominal),
        column("3", "xmin", ZenoColumnType::Feature, MetadataType::Continuous),
        column("4", "ymin", ZenoColumnType::Feature, MetadataType::Continuous),
        column("5", "xmax", ZenoColumnType::Feature, MetadataType::Continuous),
        column("6", "ymax", ZenoColumnType::Feature, MetadataType::Continuous),
        column("7", "width", ZenoColumnType::Feature, MetadataType::Continuous),
        column("8", "height", ZenoColumnType::Feature, MetadataType::Continuous),
    ];
    for (offset, model) in [(10, "yolo"), (20, "detr")] {
        let names = [
            ("output", ZenoColumnType::Output, MetadataType::Nominal),
            ("d_conf", ZenoColumnType::Feature, MetadataType::Continuous),
            ("d_xmin", ZenoColumnType::Feature, MetadataType::Continuous),
            ("d_ymin", ZenoColumnType::Feature, MetadataType::Continuous),
            ("d_xmax", ZenoColumnType::Feature, MetadataType::Continuous),
            ("d_ymax", ZenoColumnType::Feature, MetadataType::Continuous),
        ];
        for (i, (name, column_type, data_type)) in names.into_iter().enumerate() {
            columns.push(model_column(
                &(offset + i).to_string(),
                name,
                column_type,
                data_type,
                model,
            ));
        }
    }
    columns
}
