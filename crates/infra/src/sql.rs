//! # SQL 生成
//!
//! プロジェクトテーブルはテーブル名もカラム名も実行時に決まるため、
//! `sqlx::query!` ではなく [`QueryBuilder`] で組み立てる。
//!
//! - 識別子（テーブル名・カラム物理名）は [`quote_ident`] でダブルクォートする
//! - 比較値・データ ID・LIMIT / OFFSET はすべてバインドパラメータにする

use sqlx::{Postgres, QueryBuilder};
use zeno_domain::{
    filter::{Condition, ConditionGroup, DataIdFilter, FilterValue, TableFilter},
    metric::MetricQuery,
    project::ProjectId,
    table::{DIFF_COLUMN, DetectionQuery, DiffExpr, DiffKind, Page, SortOrder, TableQuery},
};

/// 識別子をダブルクォートする
///
/// 識別子中のダブルクォートは二重化する。
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// 通常モードのページ取得クエリ
///
/// ```text
/// SELECT * [, <diff> AS diff] FROM "<project>" [WHERE ...] [ORDER BY ...] LIMIT $n OFFSET $m
/// ```
pub fn table_page_query(project: &ProjectId, query: &TableQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT *");
    if let Some(diff) = &query.diff {
        qb.push(", ");
        qb.push(diff_expression(diff));
        qb.push(" AS ");
        qb.push(DIFF_COLUMN);
    }
    qb.push(" FROM ");
    qb.push(quote_ident(&project.table_name()));
    push_where(&mut qb, &query.filter);
    match &query.order {
        Some(SortOrder::Column { column, descending }) => {
            qb.push(" ORDER BY ");
            qb.push(quote_ident(column));
            qb.push(if *descending { " DESC" } else { " ASC" });
        }
        // numeric 照合順序で "2" < "10" の自然順になる
        Some(SortOrder::NaturalId(id_column)) => {
            qb.push(" ORDER BY ");
            qb.push(quote_ident(id_column));
            qb.push(" COLLATE numeric ASC");
        }
        None => {}
    }
    push_page(&mut qb, query.page);
    qb
}

/// 物体検出モードのページ取得クエリ
///
/// 正解ボックスと検出ボックスを JSON 配列にまとめる。
/// データ単位で集約する場合は `GROUP BY` し、ID と画像サイズは `MIN` を取る。
pub fn detection_page_query(
    project: &ProjectId,
    query: &DetectionQuery,
) -> QueryBuilder<'static, Postgres> {
    let c = &query.columns;
    let q = quote_ident;
    let gt_box = format!(
        "json_build_array({}, {}, {}, {})",
        q(&c.xmin),
        q(&c.ymin),
        q(&c.xmax),
        q(&c.ymax)
    );
    let d_box = format!(
        "json_build_array({}, {}, {}, {})",
        q(&c.d_xmin),
        q(&c.d_ymin),
        q(&c.d_xmax),
        q(&c.d_ymax)
    );

    let select = if query.group_by_data {
        format!(
            "SELECT MIN({id}) AS id, {data} AS data, json_agg({label}) AS label, \
             json_agg({gt_box}) AS gt_boxes, json_agg({output}) AS output, \
             json_agg({d_conf}) AS d_conf, json_agg({d_box}) AS d_boxes, \
             MIN({width}) AS width, MIN({height}) AS height",
            id = q(&c.id),
            data = q(&c.data),
            label = q(&c.label),
            output = q(&c.output),
            d_conf = q(&c.d_conf),
            width = q(&c.width),
            height = q(&c.height),
        )
    } else {
        format!(
            "SELECT {id} AS id, {data} AS data, json_build_array({label}) AS label, \
             json_build_array({gt_box}) AS gt_boxes, json_build_array({output}) AS output, \
             json_build_array({d_conf}) AS d_conf, json_build_array({d_box}) AS d_boxes, \
             {width} AS width, {height} AS height",
            id = q(&c.id),
            data = q(&c.data),
            label = q(&c.label),
            output = q(&c.output),
            d_conf = q(&c.d_conf),
            width = q(&c.width),
            height = q(&c.height),
        )
    };

    let mut qb = QueryBuilder::new(select);
    qb.push(" FROM ");
    qb.push(quote_ident(&project.table_name()));
    push_where(&mut qb, &query.filter);
    if query.group_by_data {
        qb.push(" GROUP BY ");
        qb.push(q(&c.data));
    }
    push_page(&mut qb, query.page);
    qb
}

/// フィルタだけを適用するページ取得クエリ（スライス・タグ用）
pub fn filtered_page_query(
    project: &ProjectId,
    filter: &TableFilter,
    page: Page,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM ");
    qb.push(quote_ident(&project.table_name()));
    push_where(&mut qb, filter);
    push_page(&mut qb, page);
    qb
}

/// グループメトリクスの集計クエリ
pub fn group_metric_query(project: &ProjectId, query: &MetricQuery) -> QueryBuilder<'static, Postgres> {
    let metric = match &query.metric {
        Some(expr) if expr.cast_to_int => format!("AVG({}::int)::float8", quote_ident(&expr.column)),
        Some(expr) => format!("AVG({})::float8", quote_ident(&expr.column)),
        None => "NULL::float8".to_string(),
    };
    let mut qb = QueryBuilder::new(format!("SELECT {metric} AS metric, COUNT(*) AS size FROM "));
    qb.push(quote_ident(&project.table_name()));
    push_where(&mut qb, &query.filter);
    qb
}

fn diff_expression(diff: &DiffExpr) -> String {
    let left = quote_ident(&diff.left);
    let right = quote_ident(&diff.right);
    match diff.kind {
        DiffKind::Subtract => format!("{left} - {right}"),
        DiffKind::SubtractAsInt => format!("{left}::int - {right}::int"),
        DiffKind::NotEqual => format!("{left} != {right}"),
    }
}

/// 絞り込みがあれば ` WHERE ...` を追加する
pub fn push_where(qb: &mut QueryBuilder<'static, Postgres>, filter: &TableFilter) {
    if filter.is_empty() {
        return;
    }
    qb.push(" WHERE ");
    push_filter(qb, filter);
}

/// 解決済みフィルタを条件式として追加する
///
/// 条件グループとデータ ID の絞り込みは AND で結合する。
pub fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &TableFilter) {
    let mut has_conditions = false;
    if let Some(group) = &filter.conditions {
        qb.push("(");
        push_group(qb, group);
        qb.push(")");
        has_conditions = true;
    }
    if let Some(data_ids) = &filter.data_ids {
        if has_conditions {
            qb.push(" AND ");
        }
        push_data_ids(qb, data_ids);
    }
}

fn push_group(qb: &mut QueryBuilder<'static, Postgres>, group: &ConditionGroup) {
    for (connective, condition) in group.clauses() {
        if let Some(connective) = connective {
            qb.push(" ");
            qb.push(connective.sql_keyword());
            qb.push(" ");
        }
        push_condition(qb, condition);
    }
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, condition: &Condition) {
    match condition {
        Condition::Compare {
            column,
            operation,
            value,
        } => {
            qb.push(quote_ident(&column.id));
            qb.push(" ");
            qb.push(operation.sql_operator());
            qb.push(" ");
            push_value(qb, value);
            if condition.compares_datetime_text() {
                qb.push("::timestamp");
            }
        }
        Condition::Nested(inner) => {
            qb.push("(");
            push_group(qb, inner);
            qb.push(")");
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Bool(b) => {
            qb.push_bind(*b);
        }
        FilterValue::Number(n) => match n.as_i64() {
            Some(i) => {
                qb.push_bind(i);
            }
            None => {
                qb.push_bind(n.as_f64());
            }
        },
        FilterValue::Text(s) => {
            qb.push_bind(s.clone());
        }
    }
}

fn push_data_ids(qb: &mut QueryBuilder<'static, Postgres>, data_ids: &DataIdFilter) {
    if data_ids.ids.is_empty() {
        qb.push("FALSE");
        return;
    }
    qb.push(quote_ident(&data_ids.id_column));
    qb.push("::text = ANY(");
    qb.push_bind(data_ids.ids.clone());
    qb.push(")");
}

fn push_page(qb: &mut QueryBuilder<'static, Postgres>, page: Page) {
    qb.push(" LIMIT ");
    qb.push_bind(page.limit());
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
}
