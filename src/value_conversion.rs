//! Value conversion utilities for SeaQuery to may_postgres.
//!
//! Converts the `Values` produced by a built sea-query statement into `ToSql`
//! parameters. Conversion happens in two passes: first every value is moved into an
//! owned, typed box, then references to those boxes are handed to the caller. NULLs
//! keep their column type so Postgres can bind them against typed columns.

use crate::executor::StoreError;
use may_postgres::types::ToSql;
use rust_decimal::Decimal;
use sea_query::{Value, Values};

/// Convert SeaQuery values to may_postgres ToSql parameters and run `f` with them.
///
/// # Errors
///
/// Returns `StoreError::Other` if an unsupported value type is encountered, or
/// whatever `f` returns.
pub fn with_converted_params<F, R>(values: &Values, f: F) -> Result<R, StoreError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, StoreError>,
{
    let owned = values
        .iter()
        .map(to_sql)
        .collect::<Result<Vec<_>, _>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|p| &**p as &dyn ToSql).collect();
    f(&params)
}

fn to_sql(value: &Value) -> Result<Box<dyn ToSql>, StoreError> {
    let boxed: Box<dyn ToSql> = match value {
        Value::Bool(v) => Box::new(*v),
        Value::TinyInt(v) => Box::new(v.map(i16::from)),
        Value::SmallInt(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::TinyUnsigned(v) => Box::new(v.map(i16::from)),
        Value::SmallUnsigned(v) => Box::new(v.map(i32::from)),
        Value::Unsigned(v) => Box::new(v.map(i64::from)),
        Value::BigUnsigned(Some(u)) => {
            let signed = i64::try_from(*u).map_err(|_| {
                StoreError::Other(format!(
                    "BigUnsigned value {u} exceeds i64::MAX, cannot be safely cast to i64"
                ))
            })?;
            Box::new(Some(signed))
        }
        Value::BigUnsigned(None) => Box::new(None::<i64>),
        Value::Float(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.as_ref().map(|s| String::clone(s))),
        Value::Decimal(v) => Box::new(v.as_ref().map(|d| Decimal::clone(d))),
        _ => {
            return Err(StoreError::Other(format!(
                "Unsupported value type in query: {value:?}"
            )))
        }
    };
    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_every_value() {
        let values = Values(vec![
            Value::BigInt(Some(1)),
            Value::String(None),
            Value::Bool(Some(false)),
            Value::from(Some(Decimal::new(150, 2))),
        ]);
        let count = with_converted_params(&values, |params| Ok(params.len())).unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_big_unsigned_overflow() {
        let values = Values(vec![Value::BigUnsigned(Some(u64::MAX))]);
        let err = with_converted_params(&values, |_| Ok(())).unwrap_err();
        assert!(err.to_string().contains("exceeds i64::MAX"));
    }

    #[test]
    fn test_unsupported_value() {
        let values = Values(vec![Value::Char(Some('x'))]);
        assert!(with_converted_params(&values, |_| Ok(())).is_err());
    }
}
