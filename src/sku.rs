//! SKU permutations for a product's options.
//!
//! Only options that take part in SKU generation and have at least one allowed value
//! contribute. Every combination picks exactly one value from each of them.

use crate::model::{ProductOption, ProductOptionValue};
use rust_decimal::Decimal;

/// One option paired with the value picked for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSelection<'a> {
    pub option: &'a ProductOption,
    pub value: &'a ProductOptionValue,
}

/// A single SKU: one selection per eligible option, in option order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkuCombination<'a> {
    pub selections: Vec<OptionSelection<'a>>,
}

impl SkuCombination<'_> {
    /// Sum of the selected values' price adjustments. Missing adjustments count as zero.
    pub fn price_adjustment(&self) -> Decimal {
        self.selections
            .iter()
            .filter_map(|s| s.value.price_adjustment)
            .sum()
    }

    /// Attribute values of the selections, e.g. `["Red", "Large"]`.
    pub fn attribute_values(&self) -> Vec<Option<&str>> {
        self.selections
            .iter()
            .map(|s| s.value.attribute_value.as_deref())
            .collect()
    }
}

/// Options that contribute to SKU generation.
pub fn eligible_options<'a, I>(options: I) -> impl Iterator<Item = &'a ProductOption>
where
    I: IntoIterator<Item = &'a ProductOption>,
{
    options
        .into_iter()
        .filter(|o| o.use_in_sku_generation() && !o.allowed_values().is_empty())
}

/// Number of combinations [`combinations`] would produce, or `None` on overflow.
pub fn combination_count<'a, I>(options: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a ProductOption>,
{
    let mut eligible = eligible_options(options).peekable();
    if eligible.peek().is_none() {
        return Some(0);
    }
    eligible.try_fold(1usize, |acc, o| acc.checked_mul(o.allowed_values().len()))
}

/// Cartesian product of the eligible options' allowed values.
///
/// Combinations vary the last option fastest. No eligible option means no
/// combinations.
pub fn combinations<'a, I>(options: I) -> Vec<SkuCombination<'a>>
where
    I: IntoIterator<Item = &'a ProductOption>,
{
    let eligible: Vec<&ProductOption> = eligible_options(options).collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<Vec<OptionSelection<'a>>> = vec![Vec::new()];
    for &option in &eligible {
        let mut next = Vec::with_capacity(result.len() * option.allowed_values().len());
        for partial in &result {
            for value in option.allowed_values() {
                let mut selections = partial.clone();
                selections.push(OptionSelection { option, value });
                next.push(selections);
            }
        }
        result = next;
    }

    log::debug!(
        "{} sku combinations from {} options",
        result.len(),
        eligible.len()
    );
    result
        .into_iter()
        .map(|selections| SkuCombination { selections })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductOptionType;

    fn option(name: &str, values: &[&str]) -> ProductOption {
        let mut option = ProductOption::new();
        option.set_type(Some(ProductOptionType::Text));
        option.set_attribute_name(Some(name.to_string()));
        option.set_allowed_values(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ProductOptionValue::new(*v, i as i64))
                .collect(),
        );
        option
    }

    #[test]
    fn test_cartesian_product() {
        let color = option("color", &["Red", "Blue"]);
        let size = option("size", &["S", "M", "L"]);
        let combos = combinations([&color, &size]);

        assert_eq!(combos.len(), 6);
        assert_eq!(combination_count([&color, &size]), Some(6));
        assert_eq!(combos[0].attribute_values(), [Some("Red"), Some("S")]);
        assert_eq!(combos[1].attribute_values(), [Some("Red"), Some("M")]);
        assert_eq!(combos[5].attribute_values(), [Some("Blue"), Some("L")]);
    }

    #[test]
    fn test_excluded_and_empty_options_are_skipped() {
        let color = option("color", &["Red", "Blue"]);
        let mut engraving = option("engraving", &["Yes", "No"]);
        engraving.set_use_in_sku_generation(false);
        let empty = option("monogram", &[]);

        let combos = combinations([&color, &engraving, &empty]);
        assert_eq!(combos.len(), 2);
        assert!(combos.iter().all(|c| c.selections.len() == 1));
    }

    #[test]
    fn test_unset_flag_participates() {
        let color = option("color", &["Red"]);
        assert!(color.use_in_sku_generation_state().is_unset());
        assert_eq!(combinations([&color]).len(), 1);
    }

    #[test]
    fn test_no_eligible_options() {
        let mut color = option("color", &["Red"]);
        color.set_use_in_sku_generation(false);
        assert!(combinations([&color]).is_empty());
        assert_eq!(combination_count([&color]), Some(0));
        assert!(combinations(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_price_adjustment_sum() {
        let mut color = ProductOption::new();
        color.set_allowed_values(vec![
            ProductOptionValue::new("Gold", 1).with_price_adjustment(Decimal::new(500, 2))
        ]);
        let size = option("size", &["XL"]);
        let combos = combinations([&color, &size]);
        assert_eq!(combos[0].price_adjustment(), Decimal::new(500, 2));
    }
}
