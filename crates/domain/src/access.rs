//! # 閲覧権限の判定
//!
//! プロジェクトとレポートは同じ規則で公開範囲を判定する。
//!
//! | 閲覧者 | 公開 | 非公開 |
//! |-------|------|--------|
//! | 匿名 | 閲覧可 | 401 |
//! | 所有者 | 編集可 | 編集可 |
//! | 共有先（ユーザー / 組織） | 共有設定に従う | 共有設定に従う |
//! | それ以外 | 閲覧可 | 403 |

use crate::user::UserId;

/// 閲覧者と対象リソースの関係
///
/// 所有者以外の識別済みユーザーについて、リポジトリが
/// `user_*` / `organization_*` 共有テーブルから組み立てる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Membership {
    /// ユーザー単位または組織単位の編集権限
    pub editor: bool,
}

/// アクセス許可
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub editor: bool,
}

/// アクセス拒否の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// 閲覧者が不明（ログインが必要）
    Unauthenticated,
    /// 閲覧者は特定できたが共有されていない
    Forbidden,
}

/// 閲覧権限を判定する
///
/// `membership` は閲覧者が共有先に含まれる場合のみ `Some`。
pub fn authorize(
    public: bool,
    owner: UserId,
    viewer: Option<UserId>,
    membership: Option<Membership>,
) -> Result<Permission, AccessDenied> {
    let Some(viewer) = viewer else {
        return if public {
            Ok(Permission { editor: false })
        } else {
            Err(AccessDenied::Unauthenticated)
        };
    };

    if viewer == owner {
        return Ok(Permission { editor: true });
    }

    match membership {
        Some(m) => Ok(Permission { editor: m.editor }),
        None if public => Ok(Permission { editor: false }),
        None => Err(AccessDenied::Forbidden),
    }
}
