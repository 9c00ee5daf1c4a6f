//! # API サーバー設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `ZENO_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `ZENO_PORT` | No | `8000` | ポート番号 |
//! | `DATABASE_URL` | **Yes** | - | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | `10` | 接続プールの最大接続数 |
//! | `CORS_ORIGIN` | No | 全オリジン許可 | 許可する CORS オリジン |
//! | `LOG_FORMAT` | No | `pretty` | ログ出力形式（`json` / `pretty`） |

use std::env;

use thiserror::Error;
use zeno_shared::observability::LogFormat;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値を解釈できない
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// データベース接続 URL
    pub database_url: String,
    /// 接続プールの最大接続数
    pub database_max_connections: u32,
    /// 許可する CORS オリジン（未設定なら全オリジン）
    pub cors_origin: Option<String>,
    /// ログ出力形式
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// テストでは環境変数を書き換えずに設定値を渡すために使う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("ZENO_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "ZENO_PORT", 8000)?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.is_empty()),
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default())?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
