//! # レコード形式のテーブル
//!
//! クエリ結果の行を、カラム名をキーとするレコードの配列として
//! シリアライズする。カラム順は保持される。
//!
//! ```rust
//! use zeno_domain::frame::DataFrame;
//!
//! let mut frame = DataFrame::new(vec!["id".to_string(), "score".to_string()]);
//! frame.push_row(vec![serde_json::json!("a"), serde_json::json!(0.5)]).unwrap();
//!
//! assert_eq!(serde_json::to_string(&frame).unwrap(), r#"[{"id":"a","score":0.5}]"#);
//! ```

use serde::{
    Serialize,
    Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::Value;

use crate::DomainError;

/// カラム名と行データ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    rows:    Vec<Vec<Value>>,
}

impl DataFrame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 行を追加する
    ///
    /// 値の数がカラム数と一致しない行は受け付けない。
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), DomainError> {
        if row.len() != self.columns.len() {
            return Err(DomainError::InvalidState(format!(
                "行の値の数 ({}) がカラム数 ({}) と一致しません",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for DataFrame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                values:  row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    values:  &'a [Value],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_カラム順を保ったレコード配列にシリアライズされる() {
        let mut frame = DataFrame::new(vec!["z".to_string(), "a".to_string(), "m".to_string()]);
        frame.push_row(vec![json!(1), json!(null), json!([1, 2])]).unwrap();
        frame.push_row(vec![json!(2), json!("x"), json!([])]).unwrap();

        let serialized = serde_json::to_string(&frame).unwrap();

        assert_eq!(
            serialized,
            r#"[{"z":1,"a":null,"m":[1,2]},{"z":2,"a":"x","m":[]}]"#
        );
    }

    #[test]
    fn test_行がなければ空配列になる() {
        let frame = DataFrame::new(vec!["id".to_string()]);

        assert_eq!(serde_json::to_value(&frame).unwrap(), json!([]));
    }

    #[test]
    fn test_カラム数と一致しない行はinvalid_stateになる() {
        let mut frame = DataFrame::new(vec!["id".to_string(), "label".to_string()]);

        let result = frame.push_row(vec![json!("a")]);

        assert!(matches!(result, Err(DomainError::InvalidState(_))));
        assert!(frame.is_empty());
    }
}
