//! Row ↔ record mapping driven by the schema tables.
//!
//! Records expose their fields by name ([`Mapped::field_value`]) and rebuild
//! themselves from any [`ColumnReader`]. Column names always come from the record's
//! [`TableMapping`], so renaming a column is a change to the mapping table only.

use crate::model::{ProductOption, ProductOptionValue};
use crate::schema::{self, TableMapping};
use crate::value::TriState;
use rust_decimal::Decimal;
use sea_query::Value;
use std::collections::HashMap;
use std::fmt;

/// Error raised while mapping between rows and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Field has no entry in the mapping table
    UnmappedField { table: &'static str, field: String },
    /// Column missing from the row
    ColumnNotFound(String),
    /// Column present but holding a different type
    InvalidValueType {
        column: String,
        expected: &'static str,
        actual: String,
    },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::UnmappedField { table, field } => {
                write!(f, "Field {field} is not mapped on {table}")
            }
            MappingError::ColumnNotFound(column) => write!(f, "Column not found: {column}"),
            MappingError::InvalidValueType {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Invalid value type for column {column}: expected {expected}, got {actual}"
            ),
        }
    }
}

impl std::error::Error for MappingError {}

/// Typed, nullable column access on a result row.
pub trait ColumnReader {
    fn get_i64(&self, column: &str) -> Result<Option<i64>, MappingError>;
    fn get_i32(&self, column: &str) -> Result<Option<i32>, MappingError>;
    fn get_bool(&self, column: &str) -> Result<Option<bool>, MappingError>;
    fn get_string(&self, column: &str) -> Result<Option<String>, MappingError>;
    fn get_decimal(&self, column: &str) -> Result<Option<Decimal>, MappingError>;
}

impl ColumnReader for may_postgres::Row {
    fn get_i64(&self, column: &str) -> Result<Option<i64>, MappingError> {
        pg_get(self, column, "BigInt")
    }

    fn get_i32(&self, column: &str) -> Result<Option<i32>, MappingError> {
        pg_get(self, column, "Integer")
    }

    fn get_bool(&self, column: &str) -> Result<Option<bool>, MappingError> {
        pg_get(self, column, "Boolean")
    }

    fn get_string(&self, column: &str) -> Result<Option<String>, MappingError> {
        pg_get(self, column, "String")
    }

    fn get_decimal(&self, column: &str) -> Result<Option<Decimal>, MappingError> {
        pg_get(self, column, "Decimal")
    }
}

fn pg_get<T>(
    row: &may_postgres::Row,
    column: &str,
    expected: &'static str,
) -> Result<Option<T>, MappingError>
where
    for<'a> T: may_postgres::types::FromSql<'a>,
{
    if !row.columns().iter().any(|c| c.name() == column) {
        return Err(MappingError::ColumnNotFound(column.to_string()));
    }
    row.try_get::<_, Option<T>>(column)
        .map_err(|e| MappingError::InvalidValueType {
            column: column.to_string(),
            expected,
            actual: e.to_string(),
        })
}

/// Row held in memory as column name → `sea_query::Value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    columns: HashMap<String, Value>,
}

impl ValueRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Build a row from a record using its mapping table.
    pub fn from_record<M: Mapped>(record: &M) -> Result<Self, MappingError> {
        let mapping = M::mapping();
        let mut row = ValueRow::new();
        for (column, value) in mapping
            .column_names()
            .zip(field_values(record, mapping.columns.iter().map(|c| c.field))?)
        {
            row.insert(column, value);
        }
        Ok(row)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    fn lookup(&self, column: &str) -> Result<&Value, MappingError> {
        self.columns
            .get(column)
            .ok_or_else(|| MappingError::ColumnNotFound(column.to_string()))
    }
}

fn mismatch(column: &str, expected: &'static str, actual: &Value) -> MappingError {
    MappingError::InvalidValueType {
        column: column.to_string(),
        expected,
        actual: format!("{actual:?}"),
    }
}

impl ColumnReader for ValueRow {
    fn get_i64(&self, column: &str) -> Result<Option<i64>, MappingError> {
        match self.lookup(column)? {
            Value::BigInt(v) => Ok(*v),
            Value::Int(v) => Ok(v.map(i64::from)),
            other => Err(mismatch(column, "BigInt", other)),
        }
    }

    fn get_i32(&self, column: &str) -> Result<Option<i32>, MappingError> {
        match self.lookup(column)? {
            Value::Int(v) => Ok(*v),
            other => Err(mismatch(column, "Integer", other)),
        }
    }

    fn get_bool(&self, column: &str) -> Result<Option<bool>, MappingError> {
        match self.lookup(column)? {
            Value::Bool(v) => Ok(*v),
            other => Err(mismatch(column, "Boolean", other)),
        }
    }

    fn get_string(&self, column: &str) -> Result<Option<String>, MappingError> {
        match self.lookup(column)? {
            Value::String(v) => Ok(v.as_ref().map(|s| String::clone(s))),
            other => Err(mismatch(column, "String", other)),
        }
    }

    fn get_decimal(&self, column: &str) -> Result<Option<Decimal>, MappingError> {
        match self.lookup(column)? {
            Value::Decimal(v) => Ok(v.as_ref().map(|d| Decimal::clone(d))),
            other => Err(mismatch(column, "Decimal", other)),
        }
    }
}

/// Record type with an explicit mapping table.
pub trait Mapped: Sized {
    fn mapping() -> &'static TableMapping;

    /// Value of a mapped field, or `None` when `field` is not a column of this record.
    fn field_value(&self, field: &str) -> Option<Value>;

    /// Rebuild the scalar part of a record from a row. Relations are left empty.
    fn from_reader<R: ColumnReader + ?Sized>(row: &R) -> Result<Self, MappingError>;
}

/// Values for `fields`, in the given order.
pub fn field_values<'a, M: Mapped>(
    record: &M,
    fields: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Value>, MappingError> {
    fields
        .into_iter()
        .map(|field| {
            record
                .field_value(field)
                .ok_or_else(|| MappingError::UnmappedField {
                    table: M::mapping().table,
                    field: field.to_string(),
                })
        })
        .collect()
}

/// Column name for `field` in `mapping`.
pub fn column(mapping: &TableMapping, field: &str) -> Result<&'static str, MappingError> {
    mapping
        .column(field)
        .map(|c| c.column)
        .ok_or_else(|| MappingError::UnmappedField {
            table: mapping.table,
            field: field.to_string(),
        })
}

fn tri_state(value: TriState) -> Value {
    value.as_option().into()
}

impl Mapped for ProductOption {
    fn mapping() -> &'static TableMapping {
        &schema::PRODUCT_OPTION
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        let owned = |s: Option<&str>| -> Value { s.map(str::to_owned).into() };
        Some(match field {
            "id" => self.id().into(),
            "type" => owned(self.type_code()),
            "attribute_name" => owned(self.attribute_name()),
            "label" => owned(self.stored_label()),
            "required" => tri_state(self.required()),
            "use_in_sku_generation" => tri_state(self.use_in_sku_generation_state()),
            "display_order" => self.display_order().into(),
            "validation_type" => owned(self.validation_type_code()),
            "validation_string" => owned(self.validation_string()),
            "error_code" => owned(self.error_code()),
            "error_message" => owned(self.error_message()),
            _ => return None,
        })
    }

    fn from_reader<R: ColumnReader + ?Sized>(row: &R) -> Result<Self, MappingError> {
        let m = Self::mapping();
        let mut option = ProductOption::new();
        option.set_id(row.get_i64(column(m, "id")?)?);
        option.set_type_code(row.get_string(column(m, "type")?)?);
        option.set_attribute_name(row.get_string(column(m, "attribute_name")?)?);
        option.set_label(row.get_string(column(m, "label")?)?);
        option.set_required(row.get_bool(column(m, "required")?)?);
        option.set_use_in_sku_generation(row.get_bool(column(m, "use_in_sku_generation")?)?);
        option.set_display_order(row.get_i32(column(m, "display_order")?)?);
        option.set_validation_type_code(row.get_string(column(m, "validation_type")?)?);
        option.set_validation_string(row.get_string(column(m, "validation_string")?)?);
        option.set_error_code(row.get_string(column(m, "error_code")?)?);
        option.set_error_message(row.get_string(column(m, "error_message")?)?);
        Ok(option)
    }
}

impl Mapped for ProductOptionValue {
    fn mapping() -> &'static TableMapping {
        &schema::PRODUCT_OPTION_VALUE
    }

    fn field_value(&self, field: &str) -> Option<Value> {
        Some(match field {
            "id" => self.id.into(),
            "attribute_value" => self.attribute_value.clone().into(),
            "display_order" => self.display_order.into(),
            "price_adjustment" => self.price_adjustment.into(),
            "product_option_id" => self.product_option_id.into(),
            _ => return None,
        })
    }

    fn from_reader<R: ColumnReader + ?Sized>(row: &R) -> Result<Self, MappingError> {
        let m = Self::mapping();
        Ok(ProductOptionValue {
            id: row.get_i64(column(m, "id")?)?,
            attribute_value: row.get_string(column(m, "attribute_value")?)?,
            display_order: row.get_i64(column(m, "display_order")?)?,
            price_adjustment: row.get_decimal(column(m, "price_adjustment")?)?,
            product_option_id: row.get_i64(column(m, "product_option_id")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductOptionType, ProductOptionValidationType};

    fn sample_option() -> ProductOption {
        let mut option = ProductOption::new();
        option.set_id(Some(100));
        option.set_type(Some(ProductOptionType::Size));
        option.set_attribute_name(Some("size".to_string()));
        option.set_label(Some("Size".to_string()));
        option.set_required(true);
        option.set_display_order(Some(2));
        option.set_validation_type(Some(ProductOptionValidationType::Regex));
        option.set_validation_string(Some("^(S|M|L)$".to_string()));
        option.set_error_code(Some("size.invalid".to_string()));
        option.set_error_message(Some("Pick S, M or L".to_string()));
        option
    }

    #[test]
    fn test_option_row_round_trip_keeps_unset_flag() {
        let option = sample_option();
        let row = ValueRow::from_record(&option).unwrap();
        assert_eq!(row.get("USE_IN_SKU_GENERATION"), Some(&Value::Bool(None)));
        assert_eq!(row.get("REQUIRED"), Some(&Value::Bool(Some(true))));

        let back = ProductOption::from_reader(&row).unwrap();
        assert_eq!(back, option);
        assert!(back.use_in_sku_generation_state().is_unset());
    }

    #[test]
    fn test_explicit_false_flag_survives_mapping() {
        let mut option = sample_option();
        option.set_use_in_sku_generation(false);
        let row = ValueRow::from_record(&option).unwrap();
        let back = ProductOption::from_reader(&row).unwrap();
        assert_eq!(back.use_in_sku_generation_state(), TriState::False);
        assert!(!back.use_in_sku_generation());
    }

    #[test]
    fn test_value_row_round_trip() {
        let mut value =
            ProductOptionValue::new("Large", 3).with_price_adjustment(Decimal::new(199, 2));
        value.id = Some(5);
        value.product_option_id = Some(100);
        let row = ValueRow::from_record(&value).unwrap();
        assert_eq!(ProductOptionValue::from_reader(&row).unwrap(), value);
    }

    #[test]
    fn test_missing_column() {
        let row = ValueRow::new().with("PRODUCT_OPTION_ID", 1i64);
        let err = ProductOption::from_reader(&row).unwrap_err();
        assert_eq!(err, MappingError::ColumnNotFound("OPTION_TYPE".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let row = ValueRow::new().with("LABEL", 5i32);
        let err = row.get_string("LABEL").unwrap_err();
        assert!(matches!(err, MappingError::InvalidValueType { expected: "String", .. }));
    }

    #[test]
    fn test_unmapped_field() {
        let option = sample_option();
        assert!(option.field_value("allowed_values").is_none());
        let err = field_values(&option, ["label", "colour"]).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }
}
