//! Response listing columns and secret-field masking
//!
//! Columns come from `code.dataConf.dataList` of the survey config; an
//! entry with `"isSecret": true` marks a field whose answers are masked.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::types::DataListHead;
use crate::core::constants::SECRET_MASK_CHAR;

/// Column definitions declared by a survey config
#[derive(Debug, Default)]
pub(super) struct DataColumns {
    pub(super) heads: Vec<DataListHead>,
    secret: HashSet<String>,
}

impl DataColumns {
    pub(super) fn from_code(code: &Value) -> Self {
        let mut columns = Self::default();
        let Some(list) = code
            .pointer("/dataConf/dataList")
            .and_then(Value::as_array)
        else {
            return columns;
        };

        for entry in list {
            let Some(field) = entry.get("field").and_then(Value::as_str) else {
                continue;
            };
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(field)
                .to_string();
            if entry.get("isSecret").and_then(Value::as_bool) == Some(true) {
                columns.secret.insert(field.to_string());
            }
            columns.heads.push(DataListHead {
                field: field.to_string(),
                title,
            });
        }
        columns
    }

    /// Mask string answers of secret fields in place
    pub(super) fn mask_row(&self, row: &mut Map<String, Value>) {
        for (field, value) in row.iter_mut() {
            if self.secret.contains(field)
                && let Value::String(s) = value
            {
                *s = mask_value(s);
            }
        }
    }
}

/// Keep the first and last character, mask the rest
pub(super) fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    match chars.len() {
        0 => String::new(),
        1 | 2 => SECRET_MASK_CHAR.to_string().repeat(chars.len()),
        n => {
            let mut masked = String::with_capacity(value.len());
            masked.push(chars[0]);
            masked.extend(std::iter::repeat_n(SECRET_MASK_CHAR, n - 2));
            masked.push(chars[n - 1]);
            masked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_value() {
        assert_eq!(mask_value(""), "");
        assert_eq!(mask_value("a"), "*");
        assert_eq!(mask_value("ab"), "**");
        assert_eq!(mask_value("13812345678"), "1*********8");
        assert_eq!(mask_value("张三丰"), "张*丰");
    }

    #[test]
    fn test_columns_from_code() {
        let code = json!({
            "dataConf": {
                "dataList": [
                    { "field": "name", "title": "Name" },
                    { "field": "phone", "title": "Phone", "isSecret": true },
                    { "field": "untitled" },
                    { "title": "no field" }
                ]
            }
        });
        let columns = DataColumns::from_code(&code);
        let fields: Vec<_> = columns.heads.iter().map(|h| h.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "phone", "untitled"]);
        assert_eq!(columns.heads[2].title, "untitled");

        let mut row = Map::new();
        row.insert("name".into(), json!("Alice"));
        row.insert("phone".into(), json!("13812345678"));
        row.insert("age".into(), json!(30));
        columns.mask_row(&mut row);
        assert_eq!(row["name"], "Alice");
        assert_eq!(row["phone"], "1*********8");
        assert_eq!(row["age"], 30);
    }

    #[test]
    fn test_columns_missing_data_conf() {
        let columns = DataColumns::from_code(&json!({}));
        assert!(columns.heads.is_empty());
    }
}
