//! Behaviour of the `ProductOption` record through the public API.

use catalog_options::i18n::FieldKey;
use catalog_options::presentation::PRODUCT_OPTION as PRESENTATION;
use catalog_options::{
    AdminMainEntity, CodeEnum, InMemoryTranslations, ProductId, ProductOption,
    ProductOptionType, ProductOptionValidationType, ProductOptionValue, TranslationContext,
    TriState,
};
use std::sync::Arc;

fn french_context(option_id: i64) -> TranslationContext {
    let translations = InMemoryTranslations::new().with(
        FieldKey {
            entity: ProductOption::ENTITY_NAME,
            entity_id: Some(option_id),
            field: "label",
        },
        "fr",
        "Couleur",
    );
    TranslationContext::new("fr_CA", Arc::new(translations))
}

#[test]
fn test_color_option_example() {
    let mut option = ProductOption::new();
    option.set_type(Some(ProductOptionType::Color));
    option.set_label(Some("Color".to_string()));

    let ctx = TranslationContext::default();
    assert!(option.use_in_sku_generation());
    assert_eq!(option.option_type(), Some(ProductOptionType::Color));
    assert_eq!(option.main_entity_name(&ctx).as_deref(), Some("Color"));
}

#[test]
fn test_sku_flag_defaults_to_true_only_when_unset() {
    let mut option = ProductOption::new();
    assert_eq!(option.use_in_sku_generation_state(), TriState::Unset);
    assert!(option.use_in_sku_generation());

    option.set_use_in_sku_generation(false);
    assert!(!option.use_in_sku_generation());
    assert_eq!(option.use_in_sku_generation_state(), TriState::False);

    option.set_use_in_sku_generation(true);
    assert!(option.use_in_sku_generation());

    option.set_use_in_sku_generation(None::<bool>);
    assert!(option.use_in_sku_generation_state().is_unset());
    assert!(option.use_in_sku_generation());
}

#[test]
fn test_type_round_trips_for_every_member() {
    let mut option = ProductOption::new();
    for &option_type in ProductOptionType::all() {
        option.set_type(Some(option_type));
        assert_eq!(option.option_type(), Some(option_type));
        assert_eq!(option.type_code(), Some(option_type.code()));
        assert_eq!(ProductOptionType::from_code(option_type.code()), Some(option_type));
    }

    option.set_type(None);
    assert_eq!(option.option_type(), None);
    assert_eq!(option.type_code(), None);
}

#[test]
fn test_validation_type_round_trips() {
    let mut option = ProductOption::new();
    for &validation_type in ProductOptionValidationType::all() {
        option.set_validation_type(Some(validation_type));
        assert_eq!(option.validation_type(), Some(validation_type));
    }
    option.set_validation_type(None);
    assert_eq!(option.validation_type(), None);
}

#[test]
fn test_unknown_stored_code_reads_as_none() {
    let option: ProductOption =
        serde_json::from_value(serde_json::json!({ "type": "FABRIC" })).unwrap();
    assert_eq!(option.type_code(), Some("FABRIC"));
    assert_eq!(option.option_type(), None);
}

#[test]
fn test_label_translation_never_touches_stored_value() {
    let mut option = ProductOption::new();
    option.set_id(Some(3));
    option.set_label(Some("Color".to_string()));

    let ctx = french_context(3);
    assert_eq!(option.label(&ctx).as_deref(), Some("Couleur"));
    assert_eq!(option.main_entity_name(&ctx), option.label(&ctx));
    assert_eq!(
        AdminMainEntity::main_entity_name(&option, &ctx).as_deref(),
        Some("Couleur")
    );
    assert_eq!(option.stored_label(), Some("Color"));

    option.set_label(Some("Colour".to_string()));
    assert_eq!(option.label(&ctx).as_deref(), Some("Couleur"));
    assert_eq!(
        option.label(&TranslationContext::untranslated("en")).as_deref(),
        Some("Colour")
    );
}

#[test]
fn test_allowed_values_follow_display_order() {
    let mut option = ProductOption::new();
    option.set_allowed_values(vec![
        ProductOptionValue::new("Large", 3),
        ProductOptionValue::new("Small", 1),
    ]);
    option.add_allowed_value(ProductOptionValue::new("Medium", 2));

    let orders: Vec<_> = option
        .allowed_values()
        .iter()
        .map(|v| v.display_order)
        .collect();
    assert_eq!(orders, [Some(1), Some(2), Some(3)]);

    let removed = option.remove_allowed_values(|v| v.attribute_value.as_deref() == Some("Medium"));
    assert_eq!(removed.len(), 1);
    assert_eq!(option.allowed_values().len(), 2);
}

#[test]
fn test_products_are_references() {
    let mut option = ProductOption::new();
    assert!(option.add_product(ProductId(1)));
    assert!(!option.add_product(ProductId(1)));
    assert!(option.add_product(ProductId(2)));
    assert!(option.remove_product(ProductId(1)));
    assert_eq!(option.products(), [ProductId(2)]);
}

#[test]
fn test_json_keeps_unset_apart_from_false() {
    let mut option = ProductOption::new();
    option.set_required(false);
    let json = serde_json::to_value(&option).unwrap();
    assert_eq!(json["use_in_sku_generation"], serde_json::Value::Null);
    assert_eq!(json["required"], serde_json::Value::Bool(false));

    let back: ProductOption = serde_json::from_value(json).unwrap();
    assert_eq!(back, option);
}

#[test]
fn test_presentation_metadata_is_exported() {
    let json = PRESENTATION.to_json().unwrap();
    assert_eq!(json["friendly_name"], "ProductOptionImpl_baseProductOption");
}
