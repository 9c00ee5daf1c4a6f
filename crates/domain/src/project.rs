//! # プロジェクト
//!
//! データセットとモデル出力をまとめた分析単位。
//!
//! 各プロジェクトは UUID を名前に持つ 3 つのテーブルを所有する:
//!
//! | テーブル | 内容 |
//! |---------|------|
//! | `{uuid}` | データ行（カラム名は column map の `column_id`） |
//! | `{uuid}_column_map` | カラム定義（[`ZenoColumn`](crate::column::ZenoColumn) の永続化形式） |
//! | `{uuid}_tags_datapoints` | タグとデータ ID の対応 |

use crate::DomainError;

define_uuid_id! {
    /// プロジェクト ID
    ///
    /// `Display` はハイフン付き小文字表記で、データテーブル名と一致する。
    pub struct ProjectId;
}

impl ProjectId {
    /// パスパラメータや保存済み参照から ID を解決する
    ///
    /// UUID として解釈できない値は「存在しないプロジェクト」として扱う。
    pub fn resolve(raw: &str) -> Result<Self, DomainError> {
        raw.parse().map_err(|_| DomainError::NotFound {
            entity_type: "Project",
            id:          raw.to_string(),
        })
    }

    /// データ行テーブル名
    pub fn table_name(&self) -> String {
        self.0.to_string()
    }

    /// カラム定義テーブル名
    pub fn column_map_table(&self) -> String {
        format!("{}_column_map", self.0)
    }

    /// タグ所属テーブル名
    pub fn tags_datapoints_table(&self) -> String {
        format!("{}_tags_datapoints", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const UUID: &str = "6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11";

    #[test]
    fn test_resolveで正しいuuidからidが作られる() {
        let id = ProjectId::resolve(UUID).unwrap();

        assert_eq!(id.to_string(), UUID);
    }

    #[test]
    fn test_resolveで不正な文字列はnot_foundになる() {
        let result = ProjectId::resolve("not-a-uuid");

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                entity_type: "Project",
                ..
            })
        ));
    }

    #[test]
    fn test_テーブル名がuuidから導出される() {
        let id = ProjectId::resolve(UUID).unwrap();

        assert_eq!(id.table_name(), UUID);
        assert_eq!(id.column_map_table(), format!("{UUID}_column_map"));
        assert_eq!(id.tags_datapoints_table(), format!("{UUID}_tags_datapoints"));
    }
}
