//! # スライス
//!
//! 名前付きで保存された再利用可能なフィルタ条件。

use serde::{Deserialize, Serialize};

use crate::filter::FilterPredicateGroup;

define_int_id! {
    /// スライス ID（`slices.id`）
    pub struct SliceId;
}

/// スライス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice {
    pub id:                SliceId,
    pub slice_name:        String,
    #[serde(default)]
    pub folder_id:         Option<i32>,
    pub filter_predicates: FilterPredicateGroup,
    /// 所属プロジェクト。プロジェクト削除後は `None` になり得る
    #[serde(default)]
    pub project_uuid:      Option<String>,
}
