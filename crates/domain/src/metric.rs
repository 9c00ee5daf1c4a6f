//! # グループメトリクス
//!
//! フィルタで絞り込んだデータ群に対する集計値。保存はされない。

use serde::{Deserialize, Serialize};

use crate::{
    DomainError,
    column::{MetadataType, ProjectColumns, ZenoColumn},
    filter::{FilterPredicateGroup, TableFilter, table_filter},
};

/// データ群の集計結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetric {
    #[serde(default)]
    pub metric: Option<f64>,
    pub size:   i64,
}

/// 集計リクエスト
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetricRequest {
    #[serde(default)]
    pub model:             Option<String>,
    #[serde(default)]
    pub metric_column:     Option<ZenoColumn>,
    #[serde(default)]
    pub filter_predicates: Option<FilterPredicateGroup>,
    #[serde(default)]
    pub data_ids:          Option<Vec<String>>,
}

/// 平均を取るカラム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricExpr {
    pub column:      String,
    /// 真偽値カラムは整数にキャストしてから平均する
    pub cast_to_int: bool,
}

/// 解決済みの集計クエリ
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub filter: TableFilter,
    pub metric: Option<MetricExpr>,
}

impl MetricQuery {
    /// リクエストをプロジェクトのカラムに対して解決する
    ///
    /// 空の `dataIds` は絞り込みなしとして扱う。
    pub fn from_request(
        request: &GroupMetricRequest,
        columns: &ProjectColumns,
    ) -> Result<Self, DomainError> {
        let model = request.model.as_deref();
        let data_ids = request
            .data_ids
            .as_deref()
            .filter(|ids| !ids.is_empty());
        let filter = table_filter(columns, model, request.filter_predicates.as_ref(), data_ids)?;

        let metric = match &request.metric_column {
            Some(requested) => {
                let column = columns.resolve(requested, model).ok_or_else(|| {
                    DomainError::Validation(format!(
                        "プロジェクトに存在しないカラムです: {}",
                        requested.id
                    ))
                })?;
                let cast_to_int = match column.data_type {
                    MetadataType::Continuous => false,
                    MetadataType::Boolean => true,
                    other => {
                        return Err(DomainError::Validation(format!(
                            "{other} 型のカラムは集計できません: {}",
                            column.name
                        )));
                    }
                };
                Some(MetricExpr {
                    column: column.id.clone(),
                    cast_to_int,
                })
            }
            None => None,
        };

        Ok(Self { filter, metric })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::column::fixtures::classification_project;

    fn request(json: serde_json::Value) -> GroupMetricRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_真偽値カラムは指定モデルの列に差し替えて整数キャストで集計する() {
        let columns = classification_project();
        let req = request(serde_json::json!({
            "model": "bert",
            "metricColumn": {"id": "7", "name": "correct", "columnType": "FEATURE", "dataType": "BOOLEAN", "model": "gpt2"}
        }));

        let query = MetricQuery::from_request(&req, &columns).unwrap();

        assert_eq!(
            query.metric,
            Some(MetricExpr {
                column:      "8".to_string(),
                cast_to_int: true,
            })
        );
    }

    #[test]
    fn test_集計カラムなしならサイズだけを数える() {
        let columns = classification_project();

        let query = MetricQuery::from_request(&request(serde_json::json!({})), &columns).unwrap();

        assert_eq!(query.metric, None);
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_空のdata_idsは絞り込みなしとして扱う() {
        let columns = classification_project();

        let query =
            MetricQuery::from_request(&request(serde_json::json!({"dataIds": []})), &columns).unwrap();

        assert_eq!(query.filter.data_ids, None);
    }

    #[test]
    fn test_名義型のカラムは集計できない() {
        let columns = classification_project();
        let req = request(serde_json::json!({
            "metricColumn": {"id": "2", "name": "label", "columnType": "LABEL", "dataType": "NOMINAL"}
        }));

        let result = MetricQuery::from_request(&req, &columns);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_group_metricがcamel_caseでシリアライズされる() {
        let metric = GroupMetric {
            metric: None,
            size:   0,
        };

        assert_eq!(
            serde_json::to_value(&metric).unwrap(),
            serde_json::json!({"metric": null, "size": 0})
        );
    }
}
