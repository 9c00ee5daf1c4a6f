//! # テーブル取得
//!
//! プロジェクトのデータテーブルをページ単位で取得するためのリクエストと、
//! それをプロジェクトのカラムに対して解決したクエリ。
//!
//! ## 取得モード
//!
//! | モード | 条件 | 結果 |
//! |-------|------|------|
//! | 通常 | 下記以外 | 全カラム（差分カラム `diff` 付き）を並べ替えて返す |
//! | 物体検出 | `d_conf` という名前のカラムがある | 固定 9 カラムのレコード |
//!
//! 物体検出モードでは正解ボックスと検出ボックスを配列にまとめ、
//! `isSelectedGroupBy` が真の場合はデータ（画像）単位で集約する。

use serde::Deserialize;

use crate::{
    DomainError,
    column::{MetadataType, ProjectColumns, ZenoColumn},
    filter::{FilterPredicateGroup, TableFilter, table_filter},
    slice::SliceId,
    tag::TagId,
};

/// 差分カラムの列名
pub const DIFF_COLUMN: &str = "diff";

// =========================================================================
// リクエスト
// =========================================================================

/// ページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit:  i64,
}

impl Page {
    pub fn new(offset: i64, limit: i64) -> Result<Self, DomainError> {
        if offset < 0 {
            return Err(DomainError::Validation(
                "offset は 0 以上である必要があります".to_string(),
            ));
        }
        if limit < 0 {
            return Err(DomainError::Validation(
                "limit は 0 以上である必要があります".to_string(),
            ));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }
}

/// フィルタ付きテーブル取得リクエスト
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRequest {
    /// 表示中のカラム（取得は常に全カラム）
    #[serde(default)]
    pub columns:              Vec<ZenoColumn>,
    #[serde(default)]
    pub model:                Option<String>,
    #[serde(default, rename = "diffColumn1")]
    pub diff_column_1:        Option<ZenoColumn>,
    #[serde(default, rename = "diffColumn2")]
    pub diff_column_2:        Option<ZenoColumn>,
    pub offset:               i64,
    pub limit:                i64,
    #[serde(default)]
    pub filter_predicates:    Option<FilterPredicateGroup>,
    /// (並べ替えカラム, 降順か)。カラム ID が空文字なら差分カラム
    pub sort:                 (Option<ZenoColumn>, bool),
    #[serde(default)]
    pub data_ids:             Option<Vec<String>>,
    #[serde(default, rename = "isSelectedGroupBy")]
    pub is_selected_group_by: Option<bool>,
}

impl TableRequest {
    pub fn page(&self) -> Result<Page, DomainError> {
        Page::new(self.offset, self.limit)
    }

    /// データ ID による絞り込み
    ///
    /// 空のリストは「指定なし」として扱う。
    pub fn data_id_restriction(&self) -> Option<&[String]> {
        self.data_ids.as_deref().filter(|ids| !ids.is_empty())
    }

    pub fn group_by_data(&self) -> bool {
        self.is_selected_group_by.unwrap_or(false)
    }
}

/// スライスのテーブル取得リクエスト（レポート表示用）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceTableRequest {
    pub slice_id: SliceId,
    #[serde(default)]
    pub model:    Option<String>,
    pub offset:   i64,
    pub limit:    i64,
}

impl SliceTableRequest {
    pub fn page(&self) -> Result<Page, DomainError> {
        Page::new(self.offset, self.limit)
    }
}

/// タグのテーブル取得リクエスト（レポート表示用）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagTableRequest {
    pub tag_id: TagId,
    #[serde(default)]
    pub model:  Option<String>,
    pub offset: i64,
    pub limit:  i64,
}

impl TagTableRequest {
    pub fn page(&self) -> Result<Page, DomainError> {
        Page::new(self.offset, self.limit)
    }
}

// =========================================================================
// 通常モード
// =========================================================================

/// 差分カラムの計算方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// `a - b`
    Subtract,
    /// `a::int - b::int`
    SubtractAsInt,
    /// `a != b`
    NotEqual,
}

impl From<MetadataType> for DiffKind {
    fn from(data_type: MetadataType) -> Self {
        match data_type {
            MetadataType::Continuous => Self::Subtract,
            MetadataType::Boolean => Self::SubtractAsInt,
            _ => Self::NotEqual,
        }
    }
}

/// 2 カラムの差分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffExpr {
    pub left:  String,
    pub right: String,
    pub kind:  DiffKind,
}

/// 並べ替え
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOrder {
    /// 指定カラム（または差分カラム）で並べ替え
    Column { column: String, descending: bool },
    /// ID カラムの自然順（`COLLATE numeric`）
    NaturalId(String),
}

/// 解決済みの通常モードクエリ
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub filter: TableFilter,
    pub diff:   Option<DiffExpr>,
    pub order:  Option<SortOrder>,
    pub page:   Page,
}

impl TableQuery {
    /// リクエストをプロジェクトのカラムに対して解決する
    ///
    /// # Errors
    ///
    /// - 負の offset / limit、存在しない差分・並べ替えカラムは `Validation`
    /// - 差分カラムなしで差分による並べ替えを指定した場合も `Validation`
    pub fn from_request(
        request: &TableRequest,
        columns: &ProjectColumns,
        filter: TableFilter,
    ) -> Result<Self, DomainError> {
        let page = request.page()?;

        let diff = match (&request.diff_column_1, &request.diff_column_2) {
            (Some(left), Some(right)) => {
                let left = lookup(columns, &left.id)?;
                let right = lookup(columns, &right.id)?;
                Some(DiffExpr {
                    left:  left.id.clone(),
                    right: right.id.clone(),
                    kind:  DiffKind::from(left.data_type),
                })
            }
            _ => None,
        };

        let order = match &request.sort {
            (Some(column), descending) if column.id.is_empty() => {
                if diff.is_none() {
                    return Err(DomainError::Validation(
                        "差分カラムなしで差分による並べ替えはできません".to_string(),
                    ));
                }
                Some(SortOrder::Column {
                    column:     DIFF_COLUMN.to_string(),
                    descending: *descending,
                })
            }
            (Some(column), descending) => Some(SortOrder::Column {
                column:     lookup(columns, &column.id)?.id.clone(),
                descending: *descending,
            }),
            (None, _) => columns
                .id_column()
                .map(|id| SortOrder::NaturalId(id.id.clone())),
        };

        Ok(Self {
            filter,
            diff,
            order,
            page,
        })
    }
}

fn lookup<'a>(columns: &'a ProjectColumns, id: &str) -> Result<&'a ZenoColumn, DomainError> {
    columns.find_by_id(id).ok_or_else(|| {
        DomainError::Validation(format!("プロジェクトに存在しないカラムです: {id}"))
    })
}

/// フィルタ付きテーブル取得のフィルタを組み立てる
pub fn request_filter(
    request: &TableRequest,
    columns: &ProjectColumns,
) -> Result<TableFilter, DomainError> {
    table_filter(
        columns,
        request.model.as_deref(),
        request.filter_predicates.as_ref(),
        request.data_id_restriction(),
    )
}

// =========================================================================
// 物体検出モード
// =========================================================================

/// 物体検出プロジェクトを判別するカラム名
pub const DETECTION_MARKER: &str = "d_conf";

/// 物体検出モードで参照するカラムの物理名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionColumns {
    pub id:     String,
    pub data:   String,
    pub label:  String,
    pub output: String,
    pub xmin:   String,
    pub ymin:   String,
    pub xmax:   String,
    pub ymax:   String,
    pub d_conf: String,
    pub d_xmin: String,
    pub d_ymin: String,
    pub d_xmax: String,
    pub d_ymax: String,
    pub width:  String,
    pub height: String,
}

impl DetectionColumns {
    /// 物体検出プロジェクトであればカラムを解決する
    ///
    /// `d_conf` がなければ `Ok(None)`。同名カラムは指定モデルのものを優先する。
    ///
    /// # Errors
    ///
    /// `d_conf` があるのに他の必須カラムが欠けている場合は `InvalidState`。
    pub fn detect(columns: &ProjectColumns, model: Option<&str>) -> Result<Option<Self>, DomainError> {
        if !columns.contains_name(DETECTION_MARKER) {
            return Ok(None);
        }

        let pick = |name: &str| -> Result<String, DomainError> {
            columns
                .find_by_name(name, model)
                .map(|c| c.id.clone())
                .ok_or_else(|| {
                    DomainError::InvalidState(format!("物体検出カラム {name} がありません"))
                })
        };

        Ok(Some(Self {
            id:     pick("id")?,
            data:   pick("data")?,
            label:  pick("label")?,
            output: pick("output")?,
            xmin:   pick("xmin")?,
            ymin:   pick("ymin")?,
            xmax:   pick("xmax")?,
            ymax:   pick("ymax")?,
            d_conf: pick(DETECTION_MARKER)?,
            d_xmin: pick("d_xmin")?,
            d_ymin: pick("d_ymin")?,
            d_xmax: pick("d_xmax")?,
            d_ymax: pick("d_ymax")?,
            width:  pick("width")?,
            height: pick("height")?,
        }))
    }

    /// レスポンスのレコードのキー（9 カラム固定）
    pub fn record_columns(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.data.clone(),
            self.label.clone(),
            "gt_boxes".to_string(),
            self.output.clone(),
            self.d_conf.clone(),
            "d_boxes".to_string(),
            "width".to_string(),
            "height".to_string(),
        ]
    }
}

/// 解決済みの物体検出モードクエリ
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionQuery {
    pub columns:       DetectionColumns,
    pub filter:        TableFilter,
    /// データ（画像）単位で集約するか
    pub group_by_data: bool,
    pub page:          Page,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::column::{ZenoColumnType, fixtures::*};

    fn table_request(json: serde_json::Value) -> TableRequest {
        serde_json::from_value(json).unwrap()
    }

    fn base_request() -> serde_json::Value {
        serde_json::json!({
            "columns": [],
            "offset": 0,
            "limit": 15,
            "sort": [null, false]
        })
    }

    fn with(mut base: serde_json::Value, key: &str, value: serde_json::Value) -> serde_json::Value {
        base[key] = value;
        base
    }

    fn detection_project() -> ProjectColumns {
        let names = [
            "id", "data", "label", "xmin", "ymin", "xmax", "ymax", "width", "height",
        ];
        let mut columns: Vec<ZenoColumn> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let column_type = match *name {
                    "id" => ZenoColumnType::Id,
                    "data" => ZenoColumnType::Data,
                    "label" => ZenoColumnType::Label,
                    _ => ZenoColumnType::Feature,
                };
                column(&format!("c{i}"), name, column_type, MetadataType::Continuous)
            })
            .collect();
        for model in ["yolo", "detr"] {
            for name in ["output", "d_conf", "d_xmin", "d_ymin", "d_xmax", "d_ymax"] {
                let column_type = if name == "output" {
                    ZenoColumnType::Output
                } else {
                    ZenoColumnType::Feature
                };
                columns.push(model_column(
                    &format!("{model}_{name}"),
                    name,
                    column_type,
                    MetadataType::Continuous,
                    model,
                ));
            }
        }
        ProjectColumns::new(columns)
    }

    #[rstest]
    #[case(-1, 10)]
    #[case(0, -5)]
    fn test_負のoffsetやlimitはvalidationエラーになる(#[case] offset: i64, #[case] limit: i64) {
        assert!(matches!(Page::new(offset, limit), Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_table_requestがcamel_caseでデシリアライズされる() {
        let json = with(
            with(base_request(), "diffColumn1", serde_json::json!({"id": "5", "name": "output", "columnType": "OUTPUT", "dataType": "NOMINAL", "model": "gpt2"})),
            "isSelectedGroupBy",
            serde_json::json!(true),
        );

        let request = table_request(json);

        assert_eq!(request.diff_column_1.as_ref().map(|c| c.id.clone()), Some("5".to_string()));
        assert_eq!(request.diff_column_2, None);
        assert!(request.group_by_data());
        assert_eq!(request.sort, (None, false));
    }

    #[test]
    fn test_空のdata_idsは絞り込みなしとして扱う() {
        let request = table_request(with(base_request(), "dataIds", serde_json::json!([])));

        assert_eq!(request.data_id_restriction(), None);
    }

    #[test]
    fn test_並べ替え指定なしならidカラムの自然順になる() {
        let columns = classification_project();
        let request = table_request(base_request());

        let query = TableQuery::from_request(&request, &columns, TableFilter::default()).unwrap();

        assert_eq!(query.order, Some(SortOrder::NaturalId("0".to_string())));
        assert_eq!(query.diff, None);
    }

    #[test]
    fn test_指定カラムで降順に並べ替える() {
        let columns = classification_project();
        let request = table_request(with(
            base_request(),
            "sort",
            serde_json::json!([{"id": "3", "name": "length", "columnType": "FEATURE", "dataType": "CONTINUOUS"}, true]),
        ));

        let query = TableQuery::from_request(&request, &columns, TableFilter::default()).unwrap();

        assert_eq!(
            query.order,
            Some(SortOrder::Column {
                column:     "3".to_string(),
                descending: true,
            })
        );
    }

    #[rstest]
    #[case("3", "3", DiffKind::Subtract)]
    #[case("7", "8", DiffKind::SubtractAsInt)]
    #[case("5", "6", DiffKind::NotEqual)]
    fn test_差分カラムの計算方法がデータ型で決まる(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: DiffKind,
    ) {
        let columns = classification_project();
        let as_json = |id: &str| serde_json::to_value(columns.find_by_id(id).unwrap()).unwrap();
        let request = table_request(with(
            with(with(base_request(), "diffColumn1", as_json(left)), "diffColumn2", as_json(right)),
            "sort",
            serde_json::json!([{"id": "", "name": "", "columnType": "FEATURE", "dataType": "CONTINUOUS"}, false]),
        ));

        let query = TableQuery::from_request(&request, &columns, TableFilter::default()).unwrap();

        assert_eq!(query.diff.map(|d| d.kind), Some(expected));
        assert_eq!(
            query.order,
            Some(SortOrder::Column {
                column:     DIFF_COLUMN.to_string(),
                descending: false,
            })
        );
    }

    #[test]
    fn test_差分カラムなしで差分による並べ替えはvalidationエラーになる() {
        let columns = classification_project();
        let request = table_request(with(
            base_request(),
            "sort",
            serde_json::json!([{"id": "", "name": "", "columnType": "FEATURE", "dataType": "CONTINUOUS"}, false]),
        ));

        let result = TableQuery::from_request(&request, &columns, TableFilter::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_存在しない並べ替えカラムはvalidationエラーになる() {
        let columns = classification_project();
        let request = table_request(with(
            base_request(),
            "sort",
            serde_json::json!([{"id": "99", "name": "ghost", "columnType": "FEATURE", "dataType": "NOMINAL"}, false]),
        ));

        let result = TableQuery::from_request(&request, &columns, TableFilter::default());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_d_confがなければ物体検出モードにならない() {
        let columns = classification_project();

        assert_eq!(DetectionColumns::detect(&columns, None).unwrap(), None);
    }

    #[test]
    fn test_物体検出カラムが指定モデル優先で解決され9カラムのキーになる() {
        let columns = detection_project();

        let detection = DetectionColumns::detect(&columns, Some("detr")).unwrap().unwrap();

        assert_eq!(detection.d_conf, "detr_d_conf");
        assert_eq!(detection.d_xmax, "detr_d_xmax");
        assert_eq!(
            detection.record_columns(),
            vec!["c0", "c1", "c2", "gt_boxes", "detr_output", "detr_d_conf", "d_boxes", "width", "height"]
        );
    }

    #[test]
    fn test_物体検出の必須カラムが欠けているとinvalid_stateになる() {
        let columns: ProjectColumns = detection_project()
            .into_vec()
            .into_iter()
            .filter(|c| c.name != "height")
            .collect();

        let result = DetectionColumns::detect(&columns, None);

        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }
}
