//! # レポート
//!
//! チャートとテキストを並べたユーザー作成のページ。
//! 複数のプロジェクトに紐づけられる。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::user::UserId;

define_int_id! {
    /// レポート ID（`reports.id`）
    pub struct ReportId;
}

/// レポート要素の種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ReportElementType {
    /// チャート（`data` にチャート ID を持つ）
    Chart,
    /// テキスト（`data` に本文を持つ）
    Text,
}

/// 閲覧者向けのレポート情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id:              ReportId,
    pub name:            String,
    pub owner_name:      String,
    pub linked_projects: Vec<String>,
    /// 閲覧者が編集できるか
    pub editor:          bool,
    #[serde(default)]
    pub public:          bool,
}

/// レポートの要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportElement {
    #[serde(default)]
    pub id:           Option<i32>,
    #[serde(rename = "type")]
    pub element_type: ReportElementType,
    pub position:     i32,
    #[serde(default)]
    pub data:         Option<String>,
    #[serde(default)]
    pub chart_id:     Option<i32>,
}

impl ReportElement {
    /// 保存済みの要素から作成する
    ///
    /// チャート要素の `data` が整数として読める場合、`chart_id` に設定する。
    pub fn new(
        id: Option<i32>,
        element_type: ReportElementType,
        position: i32,
        data: Option<String>,
    ) -> Self {
        let chart_id = match element_type {
            ReportElementType::Chart => data.as_deref().and_then(|d| d.trim().parse().ok()),
            ReportElementType::Text => None,
        };
        Self {
            id,
            element_type,
            position,
            data,
            chart_id,
        }
    }
}

/// レポートと要素一覧
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub report:          Report,
    pub report_elements: Vec<ReportElement>,
}

/// 保存済みのレポート
///
/// 閲覧者に依存しない部分。編集可否は閲覧者ごとに判定して [`Report`] に変換する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub id:              ReportId,
    pub name:            String,
    pub owner_id:        UserId,
    pub owner_name:      String,
    pub public:          bool,
    pub linked_projects: Vec<String>,
}

impl StoredReport {
    pub fn into_report(self, editor: bool) -> Report {
        Report {
            id: self.id,
            name: self.name,
            owner_name: self.owner_name,
            linked_projects: self.linked_projects,
            editor,
            public: self.public,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ReportElementType::Chart, Some("12"), Some(12))]
    #[case(ReportElementType::Chart, Some("not a number"), None)]
    #[case(ReportElementType::Chart, None, None)]
    #[case(ReportElementType::Text, Some("12"), None)]
    fn test_チャート要素のdataからchart_idが導出される(
        #[case] element_type: ReportElementType,
        #[case] data: Option<&str>,
        #[case] expected: Option<i32>,
    ) {
        let element = ReportElement::new(Some(1), element_type, 0, data.map(str::to_string));

        assert_eq!(element.chart_id, expected);
    }

    #[test]
    fn test_report_responseがcamel_caseでシリアライズされる() {
        let stored = StoredReport {
            id:              ReportId::new(3),
            name:            "Weekly".to_string(),
            owner_id:        UserId::new(1),
            owner_name:      "alex".to_string(),
            public:          true,
            linked_projects: vec!["6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11".to_string()],
        };
        let response = ReportResponse {
            report:          stored.into_report(false),
            report_elements: vec![ReportElement::new(
                Some(9),
                ReportElementType::Chart,
                0,
                Some("4".to_string()),
            )],
        };

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "report": {
                    "id": 3,
                    "name": "Weekly",
                    "ownerName": "alex",
                    "linkedProjects": ["6f1f1c2e-2b7a-4d8e-9a40-3c2b1d0e9f11"],
                    "editor": false,
                    "public": true
                },
                "reportElements": [
                    {"id": 9, "type": "CHART", "position": 0, "data": "4", "chartId": 4}
                ]
            })
        );
    }
}
