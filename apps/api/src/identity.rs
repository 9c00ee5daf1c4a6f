//! # 閲覧者の識別
//!
//! 前段のゲートウェイが認証済みユーザーの ID を `X-User-Id` ヘッダーで渡す。
//! ヘッダーがなければ匿名の閲覧者として扱う。

use axum::{extract::FromRequestParts, http::request::Parts};
use zeno_domain::user::UserId;

use crate::error::ApiError;

/// 閲覧者 ID を運ぶ HTTP ヘッダー名
pub const USER_ID_HEADER: &str = "x-user-id";

/// リクエストの閲覧者
///
/// `None` は匿名の閲覧者。ヘッダーの値が整数でない場合は 400 を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<UserId>);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Viewer(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(|id| Viewer(Some(UserId::new(id))))
            .ok_or_else(|| ApiError::BadRequest(format!("{USER_ID_HEADER} ヘッダーが不正です")))
    }
}
