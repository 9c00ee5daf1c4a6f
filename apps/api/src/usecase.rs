//! # ユースケース層
//!
//! API のアプリケーションロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリを `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//! - **閲覧権限**: プロジェクトを読むユースケースは必ず [`ProjectAccessChecker`] を通す
//!
//! ## モジュール構成
//!
//! - `access`: プロジェクトの閲覧権限チェック
//! - `table`: フィルタ付き / スライス / タグのテーブル取得
//! - `project`: カラムとモデルの一覧
//! - `report`: レポートの取得
//! - `metric`: グループメトリクスの集計

pub mod access;
pub mod metric;
pub mod project;
pub mod report;
pub mod table;

pub use access::ProjectAccessChecker;
pub use metric::MetricUseCaseImpl;
pub use project::ProjectUseCaseImpl;
pub use report::ReportUseCaseImpl;
pub use table::TableUseCaseImpl;
