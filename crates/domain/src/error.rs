//! # ドメイン層エラー定義
//!
//! 入力値の不備や参照先の欠落を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `InvalidState` | 500 Internal Server Error | 保存済みデータの不整合 |
//!
//! ## 使用例
//!
//! ```rust
//! use zeno_domain::DomainError;
//!
//! fn validate_limit(limit: i64) -> Result<(), DomainError> {
//!     if limit < 0 {
//!         return Err(DomainError::Validation("limit は 0 以上である必要があります".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、適切な HTTP レスポンスに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// リクエストの内容がプロジェクトの構成と矛盾する場合に使用する。
    ///
    /// # 例
    ///
    /// - 負の offset / limit
    /// - プロジェクトに存在しないカラムを参照するフィルタ
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"Project", "Slice" など）を指定する。
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Project", "Slice", "Tag", "Report"）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 保存済みデータの不整合
    ///
    /// 物体検出プロジェクトで必須カラムが欠けている場合など、
    /// クライアントの入力ではなくデータ側に原因がある場合に使用する。
    #[error("データ不整合: {0}")]
    InvalidState(String),
}
