//! # Zeno インフラ層
//!
//! PostgreSQL との接続とクエリ実行を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **SQL 生成**: 解決済みフィルタを `QueryBuilder` のバインド付き SQL に変換
//! - **行のデコード**: カラム構成が実行時に決まるプロジェクトテーブルの行を JSON 値に変換
//! - **リポジトリ実装**: ユースケース層が使うリポジトリトレイトとその実装
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! api → shared
//! ```
//!
//! スキーマとマイグレーションは別システムが管理する。このクレートは読み取りのみ行う。
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`sql`] - 識別子のクォートとフィルタの SQL 化
//! - [`row`] - 動的な行のデコード
//! - [`repository`] - リポジトリ実装

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;
pub mod row;
pub mod sql;

pub use error::InfraError;
