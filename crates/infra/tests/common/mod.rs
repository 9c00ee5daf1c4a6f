//! テスト共通フィクスチャ
//!
//! スキーマは別システムが管理するため、統合テストでは読み取りに必要な
//! テーブルだけをテストごとのデータベースに作成する。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use sqlx::PgPool;
use zeno_domain::project::ProjectId;
use zeno_infra::sql::quote_ident;

/// 分類プロジェクトの ID
pub fn classification_project_id() -> ProjectId {
    "6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11".parse().unwrap()
}

/// 物体検出プロジェクトの ID
pub fn detection_project_id() -> ProjectId {
    "0b9d7d4a-51c4-4f62-8a3e-2f7f0c6d1e22".parse().unwrap()
}

/// 型の異なるカラムを持つプロジェクトの ID
pub fn typed_project_id() -> ProjectId {
    "3c4d5e6f-7a8b-4c9d-8e0f-1a2b3c4d5e33".parse().unwrap()
}

/// 共有テーブルを作成する
pub async fn create_schema(pool: &PgPool) {
    sqlx::raw_sql(
        r#"
        CREATE COLLATION IF NOT EXISTS numeric (provider = icu, locale = 'en-u-kn-true');

        CREATE TABLE users (id SERIAL PRIMARY KEY, name TEXT NOT NULL, display_name TEXT);
        CREATE TABLE user_organization (user_id INT NOT NULL, organization_id INT NOT NULL);

        CREATE TABLE projects (uuid TEXT PRIMARY KEY, name TEXT NOT NULL, owner_id INT NOT NULL, public BOOLEAN);
        CREATE TABLE user_project (user_id INT NOT NULL, project_uuid TEXT NOT NULL, editor BOOLEAN NOT NULL);
        CREATE TABLE organization_project (organization_id INT NOT NULL, project_uuid TEXT NOT NULL, editor BOOLEAN NOT NULL);

        CREATE TABLE slices (id SERIAL PRIMARY KEY, name TEXT NOT NULL, folder_id INT, filter JSONB NOT NULL, project_uuid TEXT);
        CREATE TABLE tags (id SERIAL PRIMARY KEY, name TEXT NOT NULL, folder_id INT, project_uuid TEXT);

        CREATE TABLE reports (id SERIAL PRIMARY KEY, name TEXT NOT NULL, owner_id INT NOT NULL, public BOOLEAN);
        CREATE TABLE user_report (user_id INT NOT NULL, report_id INT NOT NULL, editor BOOLEAN NOT NULL);
        CREATE TABLE organization_report (organization_id INT NOT NULL, report_id INT NOT NULL, editor BOOLEAN NOT NULL);
        CREATE TABLE report_project (report_id INT NOT NULL, project_uuid TEXT NOT NULL);
        CREATE TABLE report_elements (id SERIAL PRIMARY KEY, report_id INT NOT NULL, type TEXT NOT NULL, data TEXT, position INT NOT NULL);
        "#,
    )
    .execute(pool)
    .await
    .expect("スキーマ作成に失敗");
}

/// 分類プロジェクトのテーブルとデータを作成する
///
/// カラム: `0` id / `1` data / `2` label / `3` length / `5` output(gpt2) / `7` correct(gpt2)
pub async fn seed_classification_project(pool: &PgPool) -> ProjectId {
    let project = classification_project_id();
    let table = quote_ident(&project.table_name());
    let column_map = quote_ident(&project.column_map_table());
    let tags = quote_ident(&project.tags_datapoints_table());

    sqlx::raw_sql(&format!(
        r#"
        CREATE TABLE {table} ("0" TEXT, "1" TEXT, "2" TEXT, "3" FLOAT8, "5" TEXT, "7" BOOLEAN);
        INSERT INTO {table} VALUES
            ('2', 'b.png', 'cat', 2.0, 'cat', TRUE),
            ('10', 'j.png', 'dog', 10.0, 'cat', FALSE),
            ('1', 'a.png', 'dog', 1.0, 'dog', TRUE);

        CREATE TABLE {column_map} (column_id TEXT, name TEXT, type TEXT, model TEXT, data_type TEXT);
        INSERT INTO {column_map} VALUES
            ('0', 'id', 'ID', NULL, 'OTHER'),
            ('1', 'data', 'DATA', NULL, 'OTHER'),
            ('2', 'label', 'LABEL', NULL, 'NOMINAL'),
            ('3', 'length', 'FEATURE', NULL, 'CONTINUOUS'),
            ('5', 'output', 'OUTPUT', 'gpt2', 'NOMINAL'),
            ('7', 'correct', 'FEATURE', 'gpt2', 'BOOLEAN');

        CREATE TABLE {tags} (tag_id INT, data_id TEXT);
        "#
    ))
    .execute(pool)
    .await
    .expect("分類プロジェクトの作成に失敗");

    project
}

/// 物体検出プロジェクトのテーブルとデータを作成する
///
/// 1 枚の画像に 2 つのボックスがある。
pub async fn seed_detection_project(pool: &PgPool) -> ProjectId {
    let project = detection_project_id();
    let table = quote_ident(&project.table_name());
    let column_map = quote_ident(&project.column_map_table());

    let names = [
        ("0", "id", "ID"),
        ("1", "data", "DATA"),
        ("2", "label", "LABEL"),
        ("3", "output", "OUTPUT"),
        ("4", "xmin", "FEATURE"),
        ("5", "ymin", "FEATURE"),
        ("6", "xmax", "FEATURE"),
        ("7", "ymax", "FEATURE"),
        ("8", "d_conf", "FEATURE"),
        ("9", "d_xmin", "FEATURE"),
        ("10", "d_ymin", "FEATURE"),
        ("11", "d_xmax", "FEATURE"),
        ("12", "d_ymax", "FEATURE"),
        ("13", "width", "FEATURE"),
        ("14", "height", "FEATURE"),
    ];
    let column_values = names
        .iter()
        .map(|(id, name, column_type)| format!("('{id}', '{name}', '{column_type}', NULL, 'OTHER')"))
        .collect::<Vec<_>>()
        .join(", ");

    sqlx::raw_sql(&format!(
        r#"
        CREATE TABLE {table} (
            "0" TEXT, "1" TEXT, "2" TEXT, "3" TEXT,
            "4" INT, "5" INT, "6" INT, "7" INT,
            "8" FLOAT8, "9" INT, "10" INT, "11" INT, "12" INT,
            "13" INT, "14" INT
        );
        INSERT INTO {table} VALUES
            ('0', 'img.png', 'car', 'car', 1, 2, 3, 4, 0.9, 1, 2, 3, 5, 640, 480),
            ('1', 'img.png', 'bus', 'car', 5, 6, 7, 8, 0.4, 5, 6, 7, 9, 640, 480);

        CREATE TABLE {column_map} (column_id TEXT, name TEXT, type TEXT, model TEXT, data_type TEXT);
        INSERT INTO {column_map} VALUES {column_values};
        "#
    ))
    .execute(pool)
    .await
    .expect("物体検出プロジェクトの作成に失敗");

    project
}

/// プロジェクト行を登録する
pub async fn insert_project(pool: &PgPool, project: &ProjectId, owner_id: i32, public: bool) {
    sqlx::query("INSERT INTO projects (uuid, name, owner_id, public) VALUES ($1, 'project', $2, $3)")
        .bind(project.to_string())
        .bind(owner_id)
        .bind(public)
        .execute(pool)
        .await
        .expect("プロジェクト登録に失敗");
}

/// ユーザーを登録し ID を返す
pub async fn insert_user(pool: &PgPool, name: &str, display_name: Option<&str>) -> i32 {
    sqlx::query_scalar("INSERT INTO users (name, display_name) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(display_name)
        .fetch_one(pool)
        .await
        .expect("ユーザー登録に失敗")
}

/// 日時・単精度・NUMERIC・NULL を含むプロジェクトを作成する
///
/// カラム: `0` id / `4` created(TIMESTAMP, DATETIME) / `5` updated(TIMESTAMPTZ) /
/// `6` score(FLOAT4) / `7` cost(NUMERIC) / `8` note(TEXT, 一部 NULL)
pub async fn seed_typed_project(pool: &PgPool) -> ProjectId {
    let project = typed_project_id();
    let table = quote_ident(&project.table_name());
    let column_map = quote_ident(&project.column_map_table());

    sqlx::raw_sql(&format!(
        r#"
        CREATE TABLE {table} ("0" TEXT, "4" TIMESTAMP, "5" TIMESTAMPTZ, "6" FLOAT4, "7" NUMERIC, "8" TEXT);
        INSERT INTO {table} VALUES
            ('1', '2024-01-02 00:00:00', '2024-01-02 00:00:00+00', 0.9, 12.50, NULL),
            ('2', '2023-01-01 00:00:00', '2023-01-01 00:00:00+00', 0.1, 3, 'old');

        CREATE TABLE {column_map} (column_id TEXT, name TEXT, type TEXT, model TEXT, data_type TEXT);
        INSERT INTO {column_map} VALUES
            ('0', 'id', 'ID', NULL, 'OTHER'),
            ('4', 'created', 'FEATURE', NULL, 'DATETIME'),
            ('5', 'updated', 'FEATURE', NULL, 'DATETIME'),
            ('6', 'score', 'FEATURE', NULL, 'CONTINUOUS'),
            ('7', 'cost', 'FEATURE', NULL, 'CONTINUOUS'),
            ('8', 'note', 'FEATURE', NULL, 'NOMINAL');
        "#
    ))
    .execute(pool)
    .await
    .expect("型検証用プロジェクトの作成に失敗");

    project
}
