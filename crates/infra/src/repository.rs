//! # リポジトリ実装
//!
//! ユースケース層が使うリポジトリトレイトと、その PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: スキーマは別システムが管理するため、このサービスは書き込まない
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **テスタビリティ**: トレイト経由でモック可能な設計（[`crate::mock`] を参照）

pub mod column_repository;
pub mod project_repository;
pub mod report_repository;
pub mod slice_repository;
pub mod table_repository;
pub mod tag_repository;

pub use column_repository::{ColumnRepository, PostgresColumnRepository};
pub use project_repository::{PostgresProjectRepository, ProjectAccess, ProjectRepository};
pub use report_repository::{PostgresReportRepository, ReportRepository};
pub use slice_repository::{PostgresSliceRepository, SliceRepository};
pub use table_repository::{PostgresTableRepository, TableRepository};
pub use tag_repository::{PostgresTagRepository, TagRepository};
