/// UUID ベースの ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`Uuid` をラップ）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `from_uuid()`: 既存 UUID から復元
/// - `as_uuid()`: 内部 UUID への参照
/// - `FromStr` impl（ハイフン付き表記をパース）
///
/// ID は外部システムが採番するため、生成用の `new()` は持たない。
///
/// # 使用例
///
/// ```rust
/// use zeno_domain::project::ProjectId;
///
/// let id: ProjectId = "6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11".parse().unwrap();
/// assert_eq!(id.to_string(), "6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11");
/// ```
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            /// 既存の UUID から ID を作成する
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// 内部の UUID 参照を取得する
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::str::FromStr for $Name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

/// 整数主キーの ID 型を定義する宣言型マクロ
///
/// `SERIAL` 主キーを持つテーブル（slices, tags, reports, users）の
/// 識別子を型で区別するために使う。JSON では素の整数として表現される。
macro_rules! define_int_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        $vis struct $Name(i32);

        impl $Name {
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// 内部の整数値を取得する
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }
    };
}
