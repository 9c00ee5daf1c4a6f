//! # Zeno API サーバー
//!
//! モデル評価ダッシュボードのフロントエンドに、プロジェクトテーブルの
//! フィルタ付き取得とレポート表示の API を提供する。
//!
//! ## アクセス制御
//!
//! 閲覧者の識別は前段のゲートウェイに任せ、このサーバーは `X-User-Id`
//! ヘッダーの値を信頼する。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Frontend   │────▶│   Gateway    │────▶│   Zeno API   │────▶│  PostgreSQL  │
//! └──────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//!                       X-User-Id を付与          読み取りのみ
//! ```
//!
//! 環境変数は [`zeno_api::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p zeno-api
//!
//! # 本番環境
//! ZENO_PORT=8000 DATABASE_URL=postgres://... LOG_FORMAT=json cargo run -p zeno-api --release
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use zeno_api::{
    app_builder::{Repositories, build_app, cors_layer},
    config::ApiConfig,
};
use zeno_infra::db;
use zeno_shared::observability::{TracingConfig, init_tracing};

/// API サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. アプリケーション設定の読み込み
/// 3. トレーシングの初期化
/// 4. データベース接続プールの作成
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;

    init_tracing(&TracingConfig::new("zeno-api", config.log_format));
    let _tracing_guard = tracing::info_span!("app", service = "zeno-api").entered();

    tracing::info!("Zeno API サーバーを起動します: {}:{}", config.host, config.port);

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("データベースへの接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    let cors = cors_layer(config.cors_origin.as_deref()).context("CORS_ORIGIN が不正です")?;
    let app = build_app(Repositories::postgres(pool), cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Zeno API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
