//! # カラム
//!
//! プロジェクトのデータテーブルを構成するカラムの定義。
//!
//! カラムの物理名（`id`）は column map が採番した値で、表示名（`name`）とは
//! 異なる。モデル出力由来のカラムは `model` にモデル名を持ち、同じ `name` の
//! カラムがモデルごとに存在する。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// カラムの役割
///
/// column map の `type` カラムに大文字で格納される。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ZenoColumnType {
    /// データインスタンスの一意識別子
    Id,
    /// 入力データ本体
    Data,
    /// 正解ラベル
    Label,
    /// モデル出力
    Output,
    /// メタデータ特徴量
    Feature,
}

/// カラムのデータ型
///
/// UI の描画方法と、差分カラムの計算方法を決める。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MetadataType {
    Nominal,
    Continuous,
    Boolean,
    Datetime,
    Embedding,
    Other,
}

/// プロジェクトのカラム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZenoColumn {
    pub id:          String,
    pub name:        String,
    pub column_type: ZenoColumnType,
    pub data_type:   MetadataType,
    #[serde(default)]
    pub model:       Option<String>,
}

impl ZenoColumn {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        column_type: ZenoColumnType,
        data_type: MetadataType,
        model: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type,
            data_type,
            model,
        }
    }

    /// 値がモデルに依存するカラムか
    ///
    /// モデル出力と、モデルに紐づく特徴量（メトリクス用の列など）が該当する。
    pub fn is_model_dependent(&self) -> bool {
        self.column_type == ZenoColumnType::Output || self.model.is_some()
    }
}

/// プロジェクトの全カラム
///
/// column map の内容を保持し、カラムの検索とモデルによる差し替えを提供する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectColumns {
    columns: Vec<ZenoColumn>,
}

impl ProjectColumns {
    pub fn new(columns: Vec<ZenoColumn>) -> Self {
        Self { columns }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZenoColumn> {
        self.columns.iter()
    }

    pub fn into_vec(self) -> Vec<ZenoColumn> {
        self.columns
    }

    /// 物理名で検索する
    pub fn find_by_id(&self, id: &str) -> Option<&ZenoColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// 表示名で検索する
    ///
    /// 同名のカラムが複数ある場合は `model` が一致するものを優先する。
    pub fn find_by_name(&self, name: &str, model: Option<&str>) -> Option<&ZenoColumn> {
        let mut candidates = self.columns.iter().filter(|c| c.name == name);
        let first = candidates.next()?;
        if first.model.as_deref() == model {
            return Some(first);
        }
        candidates
            .find(|c| c.model.as_deref() == model)
            .or(Some(first))
    }

    /// 表示名のカラムが存在するか
    pub fn contains_name(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// ID カラム
    pub fn id_column(&self) -> Option<&ZenoColumn> {
        self.columns
            .iter()
            .find(|c| c.column_type == ZenoColumnType::Id)
    }

    /// リクエストで受け取ったカラムをプロジェクトのカラムに解決する
    ///
    /// モデル依存のカラムは、指定モデルが出力した同名・同種別のカラムに
    /// 差し替える。差し替え先がない場合と、モデル非依存のカラムは物理名で引く。
    pub fn resolve(&self, column: &ZenoColumn, model: Option<&str>) -> Option<&ZenoColumn> {
        let counterpart = match model {
            Some(model) if column.is_model_dependent() => self.columns.iter().find(|c| {
                c.name == column.name
                    && c.column_type == column.column_type
                    && c.model.as_deref() == Some(model)
            }),
            _ => None,
        };
        counterpart.or_else(|| self.find_by_id(&column.id))
    }
}

impl FromIterator<ZenoColumn> for ProjectColumns {
    fn from_iter<I: IntoIterator<Item = ZenoColumn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
