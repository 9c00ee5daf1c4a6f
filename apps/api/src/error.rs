//! # API エラー定義
//!
//! API 固有のエラーと、HTTP レスポンス（RFC 9457 Problem Details）への変換を定義する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use zeno_domain::{DomainError, access::AccessDenied};
use zeno_infra::InfraError;
use zeno_shared::ErrorResponse;

/// API で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 閲覧者が不明
    #[error("ログインが必要です")]
    Unauthorized,

    /// 権限不足
    #[error("権限がありません")]
    Forbidden,

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => ApiError::BadRequest(msg),
            DomainError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} が見つかりません: {id}"))
            }
            DomainError::InvalidState(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<AccessDenied> for ApiError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => ApiError::Unauthorized,
            AccessDenied::Forbidden => ApiError::Forbidden,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
            ApiError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
            ApiError::Unauthorized => ErrorResponse::unauthorized("ログインが必要です"),
            ApiError::Forbidden => ErrorResponse::forbidden("このリソースへのアクセス権がありません"),
            ApiError::Database(e) => {
                tracing::error!(
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                ErrorResponse::internal_error()
            }
            ApiError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}
