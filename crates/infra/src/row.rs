//! # 動的な行のデコード
//!
//! プロジェクトテーブルのカラム構成は実行時に決まるため、
//! 各値を PostgreSQL の型名で判別して JSON 値に変換する。
//!
//! | PostgreSQL 型 | JSON |
//! |--------------|------|
//! | `BOOL` | bool |
//! | `INT2` / `INT4` / `INT8` / `FLOAT4` / `FLOAT8` / `NUMERIC` | number（NaN は null） |
//! | `TEXT` / `VARCHAR` / `BPCHAR` / `NAME` / `UUID` | string |
//! | `JSON` / `JSONB` | そのまま |
//! | `TIMESTAMPTZ` / `TIMESTAMP` / `DATE` | エポックミリ秒 |
//! | 上記の配列 | array |
//! | NULL | null |

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::{Column, Row, TypeInfo, ValueRef, postgres::PgRow, types::Decimal};
use zeno_domain::frame::DataFrame;

use crate::error::InfraError;

/// 行の集合をレコード形式のテーブルに変換する
///
/// カラム名は先頭行から取る。行がなければ空のテーブルになる。
pub fn rows_to_frame(rows: &[PgRow]) -> Result<DataFrame, InfraError> {
    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();
    rows_to_frame_with(rows, columns)
}

/// 行の集合を、指定したカラム名でレコード形式のテーブルに変換する
///
/// 値は位置で対応づける。
pub fn rows_to_frame_with(rows: &[PgRow], columns: Vec<String>) -> Result<DataFrame, InfraError> {
    let mut frame = DataFrame::new(columns);
    for row in rows {
        frame.push_row(decode_row(row)?)?;
    }
    Ok(frame)
}

/// 1 行の全カラムを JSON 値に変換する
pub fn decode_row(row: &PgRow) -> Result<Vec<Value>, InfraError> {
    (0..row.len()).map(|i| decode_value(row, i)).collect()
}

fn decode_value(row: &PgRow, index: usize) -> Result<Value, InfraError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        "BOOL" => Value::from(row.try_get::<bool, _>(index)?),
        "INT2" => Value::from(row.try_get::<i16, _>(index)?),
        "INT4" => Value::from(row.try_get::<i32, _>(index)?),
        "INT8" => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => float4_to_json(row.try_get::<f32, _>(index)?),
        "FLOAT8" => Value::from(row.try_get::<f64, _>(index)?),
        "NUMERIC" => numeric_to_json(row.try_get::<Decimal, _>(index)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CHAR" => Value::from(row.try_get::<String, _>(index)?),
        "UUID" => Value::from(row.try_get::<uuid::Uuid, _>(index)?.to_string()),
        "JSON" | "JSONB" => row.try_get::<Value, _>(index)?,
        "TIMESTAMPTZ" => Value::from(row.try_get::<DateTime<Utc>, _>(index)?.timestamp_millis()),
        "TIMESTAMP" => Value::from(row.try_get::<NaiveDateTime, _>(index)?.and_utc().timestamp_millis()),
        "DATE" => {
            let date = row.try_get::<NaiveDate, _>(index)?;
            Value::from(date.and_time(NaiveTime::default()).and_utc().timestamp_millis())
        }
        "BOOL[]" => Value::from(row.try_get::<Vec<Option<bool>>, _>(index)?),
        "INT2[]" => Value::from(row.try_get::<Vec<Option<i16>>, _>(index)?),
        "INT4[]" => Value::from(row.try_get::<Vec<Option<i32>>, _>(index)?),
        "INT8[]" => Value::from(row.try_get::<Vec<Option<i64>>, _>(index)?),
        "FLOAT4[]" => Value::Array(
            row.try_get::<Vec<Option<f32>>, _>(index)?
                .into_iter()
                .map(|v| v.map_or(Value::Null, float4_to_json))
                .collect(),
        ),
        "FLOAT8[]" => Value::from(row.try_get::<Vec<Option<f64>>, _>(index)?),
        "TEXT[]" | "VARCHAR[]" => Value::from(row.try_get::<Vec<Option<String>>, _>(index)?),
        other => {
            return Err(InfraError::invalid_data(format!(
                "未対応のカラム型です: {other}（{} 列目）",
                index + 1
            )));
        }
    };

    Ok(value)
}

/// FLOAT4 を最短の 10 進表記のまま JSON 数値にする
///
/// `f64::from` で広げると `0.9` が `0.8999999761581421` になる。
fn float4_to_json(value: f32) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .map_or(Value::Null, Value::from)
}

/// NUMERIC は f64 に丸めて JSON 数値にする
fn numeric_to_json(value: Decimal) -> Value {
    value
        .to_string()
        .parse::<f64>()
        .map_or(Value::Null, Value::from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(0.9, json!(0.9))]
    #[case(0.1, json!(0.1))]
    #[case(-2.5, json!(-2.5))]
    #[case(3.0, json!(3.0))]
    fn test_float4が最短表記の数値になる(#[case] input: f32, #[case] expected: Value) {
        assert_eq!(float4_to_json(input), expected);
    }

    #[rstest]
    #[case(f32::NAN)]
    #[case(f32::INFINITY)]
    fn test_有限でないfloat4はnullになる(#[case] input: f32) {
        assert_eq!(float4_to_json(input), Value::Null);
    }

    #[rstest]
    #[case("12.50", json!(12.5))]
    #[case("-3", json!(-3.0))]
    #[case("0.000001", json!(0.000001))]
    fn test_numericが数値になる(#[case] input: &str, #[case] expected: Value) {
        let decimal: Decimal = input.parse().unwrap();

        assert_eq!(numeric_to_json(decimal), expected);
    }
}
