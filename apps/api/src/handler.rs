//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: 死活監視（ping / readiness）
//! - `table`: フィルタ付き / スライス / タグのテーブル取得
//! - `project`: カラム・モデル一覧
//! - `report`: レポート取得
//! - `metric`: グループメトリクス

pub mod health;
pub mod metric;
pub mod project;
pub mod report;
pub mod table;

pub use health::{ReadinessState, ping, readiness_check};
pub use metric::{MetricState, group_metric};
pub use project::{ProjectState, list_columns, list_models};
pub use report::{ReportState, get_report};
pub use table::{TableState, filtered_table, slice_table, tag_table};
