//! # Zeno ドメイン層
//!
//! モデル評価ダッシュボードのテーブル取得とレポート表示に関わる
//! データ型と、そのうち DB に依存しない判定ロジックを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! api → shared
//! ```
//!
//! ドメイン層はインフラ層（DB）に一切依存しない。フィルタ条件の解決や
//! 閲覧権限の判定はここで行い、SQL への変換はインフラ層に任せる。
//!
//! ## モジュール構成
//!
//! - [`column`] - プロジェクトのカラム定義とカラム解決
//! - [`filter`] - フィルタ条件と [`filter::table_filter`]
//! - [`table`] - テーブル取得リクエストと解決済みクエリ
//! - [`frame`] - レコード形式のテーブル
//! - [`access`] - 閲覧権限の判定
//! - [`report`] / [`slice`] / [`tag`] / [`metric`] - 各エンティティ

#[macro_use]
mod macros;

pub mod access;
pub mod column;
pub mod error;
pub mod filter;
pub mod frame;
pub mod metric;
pub mod project;
pub mod report;
pub mod slice;
pub mod table;
pub mod tag;
pub mod user;

pub use error::DomainError;
