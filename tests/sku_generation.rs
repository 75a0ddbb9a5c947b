//! SKU combinations and value validation over a small catalog.

use catalog_options::sku::{combination_count, combinations};
use catalog_options::validation::{validate, OptionValidator};
use catalog_options::{
    ProductOption, ProductOptionType, ProductOptionValidationType, ProductOptionValue,
    ValidationError,
};
use rust_decimal::Decimal;

fn option(option_type: ProductOptionType, values: &[(&str, i64)]) -> ProductOption {
    let mut option = ProductOption::new();
    option.set_type(Some(option_type));
    option.set_allowed_values(
        values
            .iter()
            .map(|(value, order)| ProductOptionValue::new(*value, *order))
            .collect(),
    );
    option
}

#[test]
fn test_count_is_product_of_eligible_value_counts() {
    let color = option(
        ProductOptionType::Color,
        &[("Red", 1), ("Green", 2), ("Blue", 3)],
    );
    let size = option(ProductOptionType::Size, &[("S", 1), ("M", 2)]);
    let mut gift_wrap = option(ProductOptionType::Boolean, &[("Yes", 1), ("No", 2)]);
    gift_wrap.set_use_in_sku_generation(false);
    let engraving = option(ProductOptionType::Text, &[]);

    let options = [color, size, gift_wrap, engraving];
    let combos = combinations(&options);
    assert_eq!(combos.len(), 3 * 2);
    assert_eq!(combination_count(&options), Some(6));

    for combo in &combos {
        let types: Vec<_> = combo
            .selections
            .iter()
            .map(|s| s.option.option_type())
            .collect();
        assert_eq!(
            types,
            [Some(ProductOptionType::Color), Some(ProductOptionType::Size)]
        );
    }
}

#[test]
fn test_values_are_picked_in_display_order() {
    let size = option(ProductOptionType::Size, &[("L", 3), ("S", 1), ("M", 2)]);
    let picked: Vec<_> = combinations([&size])
        .iter()
        .map(|c| c.attribute_values()[0].map(str::to_owned))
        .collect();
    assert_eq!(
        picked,
        [Some("S".to_string()), Some("M".to_string()), Some("L".to_string())]
    );
}

#[test]
fn test_price_adjustments_add_up() {
    let mut color = ProductOption::new();
    color.set_allowed_values(vec![
        ProductOptionValue::new("Gold", 1).with_price_adjustment(Decimal::new(1000, 2))
    ]);
    let mut size = ProductOption::new();
    size.set_allowed_values(vec![
        ProductOptionValue::new("XL", 1).with_price_adjustment(Decimal::new(250, 2))
    ]);

    let combos = combinations([&color, &size]);
    assert_eq!(combos[0].price_adjustment(), Decimal::new(1250, 2));
}

#[test]
fn test_regex_option_reports_its_error_fields() {
    let mut zip = ProductOption::new();
    zip.set_type(Some(ProductOptionType::Input));
    zip.set_attribute_name(Some("zip".to_string()));
    zip.set_required(true);
    zip.set_validation_type(Some(ProductOptionValidationType::Regex));
    zip.set_validation_string(Some(r"\d{5}".to_string()));
    zip.set_error_code(Some("zip.format".to_string()));
    zip.set_error_message(Some("Enter five digits".to_string()));

    let validator = OptionValidator::new(&zip).unwrap();
    assert!(validator.validate(Some("12345")).is_ok());
    match validator.validate(Some("1234a")) {
        Err(ValidationError::Rejected {
            error_code,
            error_message,
            ..
        }) => {
            assert_eq!(error_code.as_deref(), Some("zip.format"));
            assert_eq!(error_message.as_deref(), Some("Enter five digits"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(matches!(
        validate(&zip, None),
        Err(ValidationError::Required { .. })
    ));
}
