//! # タグ
//!
//! データインスタンスの ID を明示的に列挙した集合。

use serde::{Deserialize, Serialize};

define_int_id! {
    /// タグ ID（`tags.id`）
    pub struct TagId;
}

/// タグ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id:           TagId,
    pub tag_name:     String,
    #[serde(default)]
    pub folder_id:    Option<i32>,
    pub data_ids:     Vec<String>,
    #[serde(default)]
    pub project_uuid: Option<String>,
}
