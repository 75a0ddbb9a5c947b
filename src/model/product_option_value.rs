//! Allowed value owned by a product option.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One permitted value for a product option, e.g. `"Red"` for `"Color"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductOptionValue {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub attribute_value: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    /// Amount added to the SKU price when this value is selected.
    #[serde(default)]
    pub price_adjustment: Option<Decimal>,
    /// Owning option. Filled in by the repository when the option is saved.
    #[serde(default)]
    pub product_option_id: Option<i64>,
}

impl ProductOptionValue {
    pub fn new(attribute_value: impl Into<String>, display_order: i64) -> Self {
        Self {
            attribute_value: Some(attribute_value.into()),
            display_order: Some(display_order),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_price_adjustment(mut self, adjustment: Decimal) -> Self {
        self.price_adjustment = Some(adjustment);
        self
    }
}

/// Ascending display order, unordered values last.
pub(crate) fn by_display_order(a: &ProductOptionValue, b: &ProductOptionValue) -> Ordering {
    match (a.display_order, b.display_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unordered_sorts_last() {
        let mut values = vec![
            ProductOptionValue {
                attribute_value: Some("none".into()),
                ..Default::default()
            },
            ProductOptionValue::new("second", 2),
            ProductOptionValue::new("first", 1),
        ];
        values.sort_by(by_display_order);
        let names: Vec<_> = values
            .iter()
            .map(|v| v.attribute_value.as_deref().unwrap())
            .collect();
        assert_eq!(names, ["first", "second", "none"]);
    }

    #[test]
    fn test_price_adjustment() {
        let value = ProductOptionValue::new("XL", 4).with_price_adjustment(Decimal::new(250, 2));
        assert_eq!(value.price_adjustment, Some(Decimal::new(250, 2)));
    }
}
