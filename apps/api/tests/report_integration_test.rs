//! レポート・メタデータ API 統合テスト
//!
//! ## テストケース
//!
//! - レポートの取得と閲覧者ごとの `editor`
//! - カラム・モデル一覧
//! - グループメトリクス
//! - 死活監視エンドポイント

mod helpers;

use axum::http::StatusCode;
use helpers::{create_test_app, get, post_json, send};
use pretty_assertions::assert_eq;
use serde_json::json;
use zeno_api::test_utils::{CLASSIFICATION_PROJECT, OWNER, STRANGER, TestRepositories, project_id};
use zeno_domain::{
    access::Membership,
    metric::GroupMetric,
    report::{ReportElement, ReportElementType, ReportId, StoredReport},
};

fn repos_with_report(public: bool) -> TestRepositories {
    let repos = TestRepositories::with_projects();
    repos.reports.add_report(StoredReport {
        id: ReportId::new(3),
        name: "Weekly".to_string(),
        owner_id: OWNER,
        owner_name: "alex".to_string(),
        public,
        linked_projects: vec![CLASSIFICATION_PROJECT.to_string()],
    });
    repos.reports.add_elements(
        ReportId::new(3),
        vec![
            ReportElement::new(Some(2), ReportElementType::Chart, 1, Some("17".to_string())),
            ReportElement::new(Some(1), ReportElementType::Text, 0, Some("Intro".to_string())),
        ],
    );
    repos
}

#[tokio::test]
async fn test_公開レポートを匿名で取得できる() {
    let repos = repos_with_report(true);

    let (status, body) = send(create_test_app(&repos), get("/api/report/3", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["editor"], false);
    assert_eq!(body["report"]["linkedProjects"], json!([CLASSIFICATION_PROJECT]));
    assert_eq!(body["reportElements"][0]["type"], "TEXT");
    assert_eq!(body["reportElements"][1]["chartId"], 17);
}

#[tokio::test]
async fn test_組織経由で編集権限を持つユーザーはeditorになる() {
    let repos = repos_with_report(false);
    repos
        .reports
        .add_membership(ReportId::new(3), STRANGER, Membership { editor: true });

    let (status, body) = send(create_test_app(&repos), get("/api/report/3", Some(STRANGER))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["editor"], true);
}

#[tokio::test]
async fn test_非公開レポートは匿名だと401が返る() {
    let repos = repos_with_report(false);

    let (status, _) = send(create_test_app(&repos), get("/api/report/3", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_カラムとモデルの一覧を取得できる() {
    let repos = TestRepositories::with_projects();

    let (status, columns) = send(
        create_test_app(&repos),
        get(&format!("/api/columns/{CLASSIFICATION_PROJECT}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(columns.as_array().unwrap().len(), 8);

    let (status, models) = send(
        create_test_app(&repos),
        get(&format!("/api/models/{CLASSIFICATION_PROJECT}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(models, json!(["bert", "gpt2"]));
}

#[tokio::test]
async fn test_グループメトリクスを取得できる() {
    let repos = TestRepositories::with_projects();
    repos.tables.set_metric(
        project_id(CLASSIFICATION_PROJECT),
        GroupMetric {
            metric: None,
            size:   3,
        },
    );

    let (status, body) = send(
        create_test_app(&repos),
        post_json(
            &format!("/api/group-metric/{CLASSIFICATION_PROJECT}"),
            json!({"dataIds": []}),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"metric": null, "size": 3}));
    let (_, query) = &repos.tables.metric_queries()[0];
    assert_eq!(query.filter.data_ids, None);
}

#[tokio::test]
async fn test_死活監視エンドポイントがルートに公開される() {
    let repos = TestRepositories::new();

    let (status, body) = send(create_test_app(&repos), get("/ping", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Success!"}));

    let (status, body) = send(create_test_app(&repos), get("/health/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
