//! # アプリケーション構築
//!
//! DI（リポジトリ・ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header::InvalidHeaderValue},
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use zeno_infra::{
    db::{DatabaseProbe, PgDatabaseProbe},
    repository::{
        ColumnRepository,
        PostgresColumnRepository,
        PostgresProjectRepository,
        PostgresReportRepository,
        PostgresSliceRepository,
        PostgresTableRepository,
        PostgresTagRepository,
        ProjectRepository,
        ReportRepository,
        SliceRepository,
        TableRepository,
        TagRepository,
    },
};
use zeno_shared::{canonical_log::CanonicalLogLineLayer, observability::make_request_span};

use crate::{
    handler::{
        MetricState,
        ProjectState,
        ReadinessState,
        ReportState,
        TableState,
        filtered_table,
        get_report,
        group_metric,
        list_columns,
        list_models,
        ping,
        readiness_check,
        slice_table,
        tag_table,
    },
    usecase::{
        MetricUseCaseImpl,
        ProjectAccessChecker,
        ProjectUseCaseImpl,
        ReportUseCaseImpl,
        TableUseCaseImpl,
    },
};

/// アプリケーションが使うリポジトリ一式
#[derive(Clone)]
pub struct Repositories {
    pub project:  Arc<dyn ProjectRepository>,
    pub column:   Arc<dyn ColumnRepository>,
    pub slice:    Arc<dyn SliceRepository>,
    pub tag:      Arc<dyn TagRepository>,
    pub report:   Arc<dyn ReportRepository>,
    pub table:    Arc<dyn TableRepository>,
    pub database: Arc<dyn DatabaseProbe>,
}

impl Repositories {
    /// 1 つの接続プールを共有する PostgreSQL 実装で組み立てる
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            project:  Arc::new(PostgresProjectRepository::new(pool.clone())),
            column:   Arc::new(PostgresColumnRepository::new(pool.clone())),
            slice:    Arc::new(PostgresSliceRepository::new(pool.clone())),
            tag:      Arc::new(PostgresTagRepository::new(pool.clone())),
            report:   Arc::new(PostgresReportRepository::new(pool.clone())),
            table:    Arc::new(PostgresTableRepository::new(pool.clone())),
            database: Arc::new(PgDatabaseProbe::new(pool)),
        }
    }
}

/// CORS レイヤーを作成する
///
/// オリジン未指定なら全オリジンを許可する。
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        Some(origin) => Ok(layer.allow_origin(HeaderValue::from_str(origin)?)),
        None => Ok(layer.allow_origin(Any)),
    }
}

/// DI コンテナの構築とルーター定義を行う
///
/// リポジトリ → ユースケース → State → Router の順に組み立てる。
/// API は `/api` 配下、死活監視はルートに置く。
pub fn build_app(repositories: Repositories, cors: CorsLayer) -> Router {
    let access = ProjectAccessChecker::new(repositories.project.clone());

    let table_state = Arc::new(TableState {
        usecase: TableUseCaseImpl::new(
            access.clone(),
            repositories.column.clone(),
            repositories.slice.clone(),
            repositories.tag.clone(),
            repositories.table.clone(),
        ),
    });
    let project_state = Arc::new(ProjectState {
        usecase: ProjectUseCaseImpl::new(access.clone(), repositories.column.clone()),
    });
    let metric_state = Arc::new(MetricState {
        usecase: MetricUseCaseImpl::new(
            access,
            repositories.column.clone(),
            repositories.table.clone(),
        ),
    });
    let report_state = Arc::new(ReportState {
        usecase: ReportUseCaseImpl::new(repositories.report.clone()),
    });
    let readiness_state = Arc::new(ReadinessState {
        database: repositories.database,
    });

    let api = Router::new()
        .merge(
            Router::new()
                .route("/filtered-table/{project_uuid}", post(filtered_table))
                .route("/slice-table", post(slice_table))
                .route("/tag-table", post(tag_table))
                .with_state(table_state),
        )
        .merge(
            Router::new()
                .route("/columns/{project_uuid}", get(list_columns))
                .route("/models/{project_uuid}", get(list_models))
                .with_state(project_state),
        )
        .merge(
            Router::new()
                .route("/group-metric/{project_uuid}", post(group_metric))
                .with_state(metric_state),
        )
        .merge(
            Router::new()
                .route("/report/{report_id}", get(get_report))
                .with_state(report_state),
        );

    // レイヤー順序: 下に書いたものが外側
    // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID を生成（またはクライアント提供値を使用）
    // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
    // 3. CanonicalLogLineLayer: リクエスト完了時に1行サマリログを出力（スパン内）
    // 4. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
    Router::new()
        .route("/ping", get(ping))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .nest("/api", api)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
