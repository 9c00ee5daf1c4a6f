//! # フィルタ
//!
//! ユーザーが組み立てたフィルタ条件と、それをプロジェクトのカラムに
//! 対して解決した [`TableFilter`]。
//!
//! SQL への変換はインフラ層が担当する。このモジュールは、参照カラムの
//! 存在確認とモデルによる差し替え、結合子の正規化までを行う。
//!
//! ## 結合規則
//!
//! - グループ内の最初の条件の `join` は無視する
//! - 2 番目以降は `&` で AND、`|` で OR、省略時は AND
//! - ネストしたグループは括弧で囲む。空のグループは取り除く

use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    column::{MetadataType, ProjectColumns, ZenoColumn},
};

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "ILIKE")]
    ILike,
    #[serde(rename = "REGEX")]
    Regex,
}

impl Operation {
    /// PostgreSQL の演算子
    pub fn sql_operator(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::Regex => "~",
        }
    }
}

/// 条件の結合子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Join {
    #[serde(rename = "&")]
    And,
    #[serde(rename = "|")]
    Or,
    #[default]
    #[serde(rename = "")]
    Omitted,
}

/// 正規化後の結合子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl From<Join> for Connective {
    fn from(join: Join) -> Self {
        match join {
            Join::Or => Self::Or,
            Join::And | Join::Omitted => Self::And,
        }
    }
}

/// 比較値
///
/// JSON の型をそのまま保持し、インフラ層で対応する型としてバインドする。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

/// 単一カラムに対する条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub column:    ZenoColumn,
    pub operation: Operation,
    pub value:     FilterValue,
    #[serde(default)]
    pub join:      Join,
}

/// 条件または条件グループ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Predicate(FilterPredicate),
    Group(FilterPredicateGroup),
}

/// 条件グループ
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterPredicateGroup {
    pub predicates: Vec<FilterNode>,
    #[serde(default)]
    pub join:       Join,
}

impl FilterPredicateGroup {
    /// 保存済みスライスのフィルタ JSON から復元する
    ///
    /// 保存形式のうち `predicates` 配列だけを使い、外側の結合子は省略扱いとする。
    pub fn from_stored(value: &serde_json::Value) -> Result<Self, DomainError> {
        let predicates = value.get("predicates").ok_or_else(|| {
            DomainError::InvalidState("スライスのフィルタに predicates がありません".to_string())
        })?;
        let predicates = Vec::<FilterNode>::deserialize(predicates)
            .map_err(|e| DomainError::InvalidState(format!("スライスのフィルタが不正です: {e}")))?;

        Ok(Self {
            predicates,
            join: Join::Omitted,
        })
    }
}

// =========================================================================
// 解決済みフィルタ
// =========================================================================

/// 解決済みの条件
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column:    ZenoColumn,
        operation: Operation,
        value:     FilterValue,
    },
    Nested(ConditionGroup),
}

impl Condition {
    /// `DATETIME` カラムを文字列と比較する条件か
    ///
    /// この場合、比較値を timestamp にキャストする必要がある。
    pub fn compares_datetime_text(&self) -> bool {
        matches!(
            self,
            Self::Compare {
                column,
                value: FilterValue::Text(_),
                ..
            } if column.data_type == MetadataType::Datetime
        )
    }
}

/// 解決済みの条件グループ
///
/// 最初の要素の結合子は常に `None`、2 番目以降は常に `Some`。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    clauses: Vec<(Option<Connective>, Condition)>,
}

impl ConditionGroup {
    pub fn clauses(&self) -> &[(Option<Connective>, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn push(&mut self, join: Join, condition: Condition) {
        let connective = if self.clauses.is_empty() {
            None
        } else {
            Some(Connective::from(join))
        };
        self.clauses.push((connective, condition));
    }
}

/// データ ID による絞り込み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIdFilter {
    /// ID カラムの物理名
    pub id_column: String,
    /// 空の場合はどの行にも一致しない
    pub ids:       Vec<String>,
}

/// プロジェクトのカラムに対して解決済みのフィルタ
///
/// 条件とデータ ID の絞り込みは AND で結合される。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableFilter {
    pub conditions: Option<ConditionGroup>,
    pub data_ids:   Option<DataIdFilter>,
}

impl TableFilter {
    /// 絞り込みが一切ないか
    pub fn is_empty(&self) -> bool {
        self.conditions.is_none() && self.data_ids.is_none()
    }
}

/// フィルタ条件とデータ ID をプロジェクトのカラムに対して解決する
///
/// `data_ids` が `Some` の場合、空であっても絞り込みとして扱う
/// （どの行にも一致しない）。「指定なし」として扱うかどうかは呼び出し側が決める。
///
/// # Errors
///
/// - 条件がプロジェクトに存在しないカラムを参照している場合は `Validation`
/// - データ ID 指定時にプロジェクトに ID カラムがない場合は `InvalidState`
pub fn table_filter(
    columns: &ProjectColumns,
    model: Option<&str>,
    predicates: Option<&FilterPredicateGroup>,
    data_ids: Option<&[String]>,
) -> Result<TableFilter, DomainError> {
    let conditions = match predicates {
        Some(group) => {
            let resolved = resolve_group(columns, model, group)?;
            (!resolved.is_empty()).then_some(resolved)
        }
        None => None,
    };

    let data_ids = match data_ids {
        Some(ids) => {
            let id_column = columns.id_column().ok_or_else(|| {
                DomainError::InvalidState("プロジェクトに ID カラムがありません".to_string())
            })?;
            Some(DataIdFilter {
                id_column: id_column.id.clone(),
                ids:       ids.to_vec(),
            })
        }
        None => None,
    };

    Ok(TableFilter {
        conditions,
        data_ids,
    })
}

fn resolve_group(
    columns: &ProjectColumns,
    model: Option<&str>,
    group: &FilterPredicateGroup,
) -> Result<ConditionGroup, DomainError> {
    let mut resolved = ConditionGroup::default();

    for node in &group.predicates {
        match node {
            FilterNode::Predicate(predicate) => {
                let column = columns.resolve(&predicate.column, model).ok_or_else(|| {
                    DomainError::Validation(format!(
                        "プロジェクトに存在しないカラムです: {}",
                        predicate.column.id
                    ))
                })?;
                resolved.push(
                    predicate.join,
                    Condition::Compare {
                        column:    column.clone(),
                        operation: predicate.operation,
                        value:     predicate.value.clone(),
                    },
                );
            }
            FilterNode::Group(nested) => {
                let inner = resolve_group(columns, model, nested)?;
                if !inner.is_empty() {
                    resolved.push(nested.join, Condition::Nested(inner));
                }
            }
        }
    }

    Ok(resolved)
}
