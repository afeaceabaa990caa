//! Records and their statically declared field tables.
//!
//! Generated record types implement [`Record`] with a `FIELDS` table built at generation time;
//! [`LocalFieldsMetadata`] is derived from that table once per accessor and never changes after.

use crate::error::QueryError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::sync::{Arc, OnceLock};

/// One row as read from (or written to) the store, keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Int,
    Long,
    Double,
    Bool,
}

impl FieldType {
    /// Accepts the primitive names used in declarations, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" | "text" => Some(FieldType::String),
            "int" | "integer" | "i32" => Some(FieldType::Int),
            "long" | "i64" => Some(FieldType::Long),
            "double" | "float" | "f64" | "f32" => Some(FieldType::Double),
            "bool" | "boolean" => Some(FieldType::Bool),
            _ => None,
        }
    }

    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::String)
    }
}

/// Static description of one stored column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub column: &'static str,
    pub field_type: FieldType,
    pub primary_key: bool,
}

impl FieldDef {
    pub const fn new(column: &'static str, field_type: FieldType) -> Self {
        FieldDef {
            column,
            field_type,
            primary_key: false,
        }
    }

    pub const fn primary(column: &'static str, field_type: FieldType) -> Self {
        FieldDef {
            column,
            field_type,
            primary_key: true,
        }
    }
}

/// Structured in-memory representation of one entity.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static {
    const FIELDS: &'static [FieldDef];
}

/// Records whose fields are addressed by ordinal position.
pub trait NumberedFields: Record {
    const FIELD_COUNT: usize;
}

/// Parameter records sent under a fixed request parameter name.
pub trait CustomParameter {
    fn parameter_name(&self) -> &'static str;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFieldsMetadata {
    /// Primary key first, then the remaining columns in declaration order.
    pub ordered_columns: Vec<String>,
    pub primary_key_column: Option<String>,
    /// `(PK, A, B)`
    pub insert_column_list: String,
}

impl LocalFieldsMetadata {
    pub fn from_fields(fields: &[FieldDef]) -> Result<Self, QueryError> {
        let mut primary: Option<&FieldDef> = None;
        for f in fields.iter().filter(|f| f.primary_key) {
            if let Some(first) = primary {
                return Err(QueryError::DuplicatePrimaryKey {
                    first: first.column.to_string(),
                    second: f.column.to_string(),
                });
            }
            primary = Some(f);
        }
        let ordered_columns: Vec<String> = primary
            .into_iter()
            .chain(fields.iter().filter(|f| !f.primary_key))
            .map(|f| f.column.to_string())
            .collect();
        let insert_column_list = format!("({})", ordered_columns.join(", "));
        Ok(LocalFieldsMetadata {
            ordered_columns,
            primary_key_column: primary.map(|f| f.column.to_string()),
            insert_column_list,
        })
    }

    pub fn of<R: Record>() -> Result<Self, QueryError> {
        Self::from_fields(R::FIELDS)
    }
}

/// Lazily filled metadata cache owned by an accessor. Published once, fully built.
pub type FieldsSlot = OnceLock<Arc<LocalFieldsMetadata>>;

/// Read the slot, building and publishing the metadata on first use. Concurrent first
/// callers may each build a copy; the first one stored wins.
pub fn cached_metadata<R: Record>(slot: &FieldsSlot) -> Result<Arc<LocalFieldsMetadata>, QueryError> {
    if let Some(meta) = slot.get() {
        return Ok(meta.clone());
    }
    let built = Arc::new(LocalFieldsMetadata::of::<R>()?);
    Ok(slot.get_or_init(|| built).clone())
}

pub fn record_to_row<R: Record>(record: &R) -> Result<Row, QueryError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(QueryError::NotAnObject),
    }
}

/// Decode a stored row. Every declared column is coerced to its field type first, since
/// the store keeps all columns as text.
pub fn row_to_record<R: Record>(mut row: Row) -> Result<R, serde_json::Error> {
    for field in R::FIELDS {
        if let Some(v) = row.remove(field.column) {
            row.insert(field.column.to_string(), coerce(v, field.field_type));
        }
    }
    serde_json::from_value(Value::Object(row))
}

fn coerce(value: Value, ty: FieldType) -> Value {
    match (value, ty) {
        (Value::String(s), _) if s.is_empty() => Value::Null,
        (Value::String(s), FieldType::Int | FieldType::Long) => s
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null),
        (Value::String(s), FieldType::Double) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        (Value::String(s), FieldType::Bool) => match s.trim() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => Value::Null,
        },
        (Value::Number(n), FieldType::String) => Value::String(n.to_string()),
        (Value::Number(n), FieldType::Bool) => Value::Bool(n.as_i64().is_some_and(|v| v != 0)),
        (Value::Bool(b), FieldType::String) => Value::String(b.to_string()),
        (v, _) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(rename = "CODE", default)]
        code: Option<String>,
        #[serde(rename = "TID", default)]
        tid: Option<String>,
        #[serde(rename = "QTY", default)]
        qty: Option<i32>,
        #[serde(rename = "DONE", default)]
        done: Option<bool>,
    }

    impl Record for Sample {
        const FIELDS: &'static [FieldDef] = &[
            FieldDef::new("CODE", FieldType::String),
            FieldDef::primary("TID", FieldType::String),
            FieldDef::new("QTY", FieldType::Int),
            FieldDef::new("DONE", FieldType::Bool),
        ];
    }

    #[test]
    fn metadata_puts_primary_key_first() {
        let meta = LocalFieldsMetadata::of::<Sample>().unwrap();
        assert_eq!(meta.ordered_columns, vec!["TID", "CODE", "QTY", "DONE"]);
        assert_eq!(meta.primary_key_column.as_deref(), Some("TID"));
        assert_eq!(meta.insert_column_list, "(TID, CODE, QTY, DONE)");
    }

    #[test]
    fn second_primary_key_rejected() {
        let fields = [
            FieldDef::primary("A", FieldType::String),
            FieldDef::primary("B", FieldType::String),
        ];
        let err = LocalFieldsMetadata::from_fields(&fields).unwrap_err();
        assert!(matches!(err, QueryError::DuplicatePrimaryKey { .. }));
    }

    #[test]
    fn slot_is_filled_once() {
        let slot = FieldsSlot::new();
        let first = cached_metadata::<Sample>(&slot).unwrap();
        let second = cached_metadata::<Sample>(&slot).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn text_columns_coerced_to_field_types() {
        let mut row = Row::new();
        row.insert("TID".into(), Value::String("7".into()));
        row.insert("CODE".into(), Value::String(String::new()));
        row.insert("QTY".into(), Value::String("12".into()));
        row.insert("DONE".into(), Value::String("true".into()));
        let rec: Sample = row_to_record(row).unwrap();
        assert_eq!(
            rec,
            Sample {
                code: None,
                tid: Some("7".into()),
                qty: Some(12),
                done: Some(true),
            }
        );
    }
}
