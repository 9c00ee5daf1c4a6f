//! # Zeno API ライブラリ
//!
//! モデル評価ダッシュボードのテーブル取得・レポート API を提供する。
//! ルーター構築は [`app_builder::build_app`]、起動は `main.rs` が担当する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod identity;
pub mod usecase;

// テストユーティリティ（内部実装、ドキュメントからは隠す）
#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;
