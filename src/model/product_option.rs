//! The `ProductOption` record.

use super::product::ProductId;
use super::product_option_value::{by_display_order, ProductOptionValue};
use crate::i18n::{FieldKey, TranslationContext};
use crate::presentation::AdminMainEntity;
use crate::types::{resolve_code, CodeEnum, ProductOptionType, ProductOptionValidationType};
use crate::value::TriState;
use serde::{Deserialize, Deserializer, Serialize};

/// One configurable attribute a catalog product can expose, e.g. "Color".
///
/// Enumerated columns are stored as their string code and exposed through
/// [`ProductOptionType`] / [`ProductOptionValidationType`]. The label is stored in the
/// default locale and read through a [`TranslationContext`].
///
/// # Example
///
/// ```
/// use catalog_options::{ProductOption, ProductOptionType, TranslationContext};
///
/// let mut option = ProductOption::new();
/// option.set_type(Some(ProductOptionType::Color));
/// option.set_label(Some("Color".to_string()));
///
/// let ctx = TranslationContext::untranslated("en");
/// assert!(option.use_in_sku_generation());
/// assert_eq!(option.option_type(), Some(ProductOptionType::Color));
/// assert_eq!(option.main_entity_name(&ctx).as_deref(), Some("Color"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductOption {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default, rename = "type")]
    option_type: Option<String>,
    #[serde(default)]
    attribute_name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    required: TriState,
    #[serde(default)]
    use_in_sku_generation: TriState,
    #[serde(default)]
    display_order: Option<i32>,
    #[serde(default)]
    validation_type: Option<String>,
    #[serde(default)]
    validation_string: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default, deserialize_with = "sorted_values")]
    allowed_values: Vec<ProductOptionValue>,
    #[serde(default, deserialize_with = "distinct_products")]
    products: Vec<ProductId>,
}

impl ProductOption {
    /// Entity name used for translation keys and logging.
    pub const ENTITY_NAME: &'static str = "ProductOption";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// The option classification. Unset or unrecognized codes read as `None`.
    pub fn option_type(&self) -> Option<ProductOptionType> {
        resolve_code(self.option_type.as_deref())
    }

    pub fn set_type(&mut self, option_type: Option<ProductOptionType>) {
        self.option_type = option_type.map(|t| t.code().to_string());
    }

    /// Raw stored `OPTION_TYPE` code.
    pub fn type_code(&self) -> Option<&str> {
        self.option_type.as_deref()
    }

    pub(crate) fn set_type_code(&mut self, code: Option<String>) {
        self.option_type = code;
    }

    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute_name.as_deref()
    }

    pub fn set_attribute_name(&mut self, attribute_name: Option<String>) {
        self.attribute_name = attribute_name;
    }

    /// Label for the context's locale, falling back to the stored default.
    pub fn label(&self, ctx: &TranslationContext) -> Option<String> {
        ctx.resolve(self.field_key("label"), self.label.as_deref())
    }

    /// Stored default-locale label, never translated.
    pub fn stored_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub fn required(&self) -> TriState {
        self.required
    }

    pub fn set_required(&mut self, required: impl Into<TriState>) {
        self.required = required.into();
    }

    /// Whether this option takes part in SKU generation. Unset means `true`.
    pub fn use_in_sku_generation(&self) -> bool {
        self.use_in_sku_generation.unwrap_or(true)
    }

    /// Raw flag, keeping unset apart from an explicit `false`.
    pub fn use_in_sku_generation_state(&self) -> TriState {
        self.use_in_sku_generation
    }

    pub fn set_use_in_sku_generation(&mut self, value: impl Into<TriState>) {
        self.use_in_sku_generation = value.into();
    }

    pub fn display_order(&self) -> Option<i32> {
        self.display_order
    }

    pub fn set_display_order(&mut self, display_order: Option<i32>) {
        self.display_order = display_order;
    }

    /// Validation strategy. Unset or unrecognized codes read as `None`.
    pub fn validation_type(&self) -> Option<ProductOptionValidationType> {
        resolve_code(self.validation_type.as_deref())
    }

    pub fn set_validation_type(&mut self, validation_type: Option<ProductOptionValidationType>) {
        self.validation_type = validation_type.map(|t| t.code().to_string());
    }

    /// Raw stored `VALIDATION_TYPE` code.
    pub fn validation_type_code(&self) -> Option<&str> {
        self.validation_type.as_deref()
    }

    pub(crate) fn set_validation_type_code(&mut self, code: Option<String>) {
        self.validation_type = code;
    }

    pub fn validation_string(&self) -> Option<&str> {
        self.validation_string.as_deref()
    }

    pub fn set_validation_string(&mut self, validation_string: Option<String>) {
        self.validation_string = validation_string;
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn set_error_code(&mut self, error_code: Option<String>) {
        self.error_code = error_code;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn set_error_message(&mut self, error_message: Option<String>) {
        self.error_message = error_message;
    }

    /// Owned allowed values in ascending display order.
    pub fn allowed_values(&self) -> &[ProductOptionValue] {
        &self.allowed_values
    }

    /// Replace the allowed values. They are re-sorted by display order; ties keep
    /// the given order.
    pub fn set_allowed_values(&mut self, mut values: Vec<ProductOptionValue>) {
        values.sort_by(by_display_order);
        self.allowed_values = values;
    }

    /// Add one allowed value at its display-order position.
    pub fn add_allowed_value(&mut self, value: ProductOptionValue) {
        let at = self
            .allowed_values
            .partition_point(|v| by_display_order(v, &value).is_le());
        self.allowed_values.insert(at, value);
    }

    /// Remove and return the allowed values matching `pred`.
    pub fn remove_allowed_values<F>(&mut self, mut pred: F) -> Vec<ProductOptionValue>
    where
        F: FnMut(&ProductOptionValue) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.allowed_values)
            .into_iter()
            .partition(|v| pred(v));
        self.allowed_values = kept;
        removed
    }

    pub(crate) fn allowed_values_mut(&mut self) -> &mut [ProductOptionValue] {
        &mut self.allowed_values
    }

    /// Products referencing this option.
    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    /// Replace the product references. Repeated products are kept once, first
    /// occurrence wins.
    pub fn set_products(&mut self, products: Vec<ProductId>) {
        self.products = dedup_products(products);
    }

    /// Reference a product. Returns `false` when it was already referenced.
    pub fn add_product(&mut self, product: ProductId) -> bool {
        if self.products.contains(&product) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Drop a product reference. The product itself is unaffected.
    pub fn remove_product(&mut self, product: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| *p != product);
        self.products.len() != before
    }

    /// Human readable name for generic admin listings; same as [`label`](Self::label).
    pub fn main_entity_name(&self, ctx: &TranslationContext) -> Option<String> {
        self.label(ctx)
    }

    fn field_key<'a>(&self, field: &'a str) -> FieldKey<'a> {
        FieldKey {
            entity: Self::ENTITY_NAME,
            entity_id: self.id,
            field,
        }
    }
}

fn dedup_products(mut products: Vec<ProductId>) -> Vec<ProductId> {
    let mut seen = std::collections::HashSet::with_capacity(products.len());
    products.retain(|p| seen.insert(*p));
    products
}

fn sorted_values<'de, D>(deserializer: D) -> Result<Vec<ProductOptionValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut values = Vec::<ProductOptionValue>::deserialize(deserializer)?;
    values.sort_by(by_display_order);
    Ok(values)
}

fn distinct_products<'de, D>(deserializer: D) -> Result<Vec<ProductId>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<ProductId>::deserialize(deserializer).map(dedup_products)
}

impl AdminMainEntity for ProductOption {
    fn main_entity_name(&self, ctx: &TranslationContext) -> Option<String> {
        ProductOption::main_entity_name(self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::InMemoryTranslations;
    use std::sync::Arc;

    fn color_option() -> ProductOption {
        let mut option = ProductOption::new();
        option.set_id(Some(7));
        option.set_type(Some(ProductOptionType::Color));
        option.set_label(Some("Color".to_string()));
        option
    }

    #[test]
    fn test_use_in_sku_generation_defaults_to_true() {
        let option = ProductOption::new();
        assert!(option.use_in_sku_generation());
        assert!(option.use_in_sku_generation_state().is_unset());
    }

    #[test]
    fn test_use_in_sku_generation_explicit_false() {
        let mut option = ProductOption::new();
        option.set_use_in_sku_generation(false);
        assert!(!option.use_in_sku_generation());
        assert_eq!(option.use_in_sku_generation_state(), TriState::False);

        option.set_use_in_sku_generation(None::<bool>);
        assert!(option.use_in_sku_generation());
    }

    #[test]
    fn test_type_round_trip() {
        let mut option = ProductOption::new();
        for member in ProductOptionType::all() {
            option.set_type(Some(*member));
            assert_eq!(option.option_type(), Some(*member));
            assert_eq!(option.type_code(), Some(member.code()));
        }
        option.set_type(None);
        assert_eq!(option.option_type(), None);
        assert_eq!(option.type_code(), None);
    }

    #[test]
    fn test_unknown_stored_type_reads_as_none() {
        let mut option = ProductOption::new();
        option.set_type_code(Some("FLAVOUR".to_string()));
        assert_eq!(option.option_type(), None);
        assert_eq!(option.type_code(), Some("FLAVOUR"));
    }

    #[test]
    fn test_validation_type_round_trip() {
        let mut option = ProductOption::new();
        option.set_validation_type(Some(ProductOptionValidationType::Regex));
        assert_eq!(
            option.validation_type(),
            Some(ProductOptionValidationType::Regex)
        );
        option.set_validation_type(None);
        assert_eq!(option.validation_type(), None);
    }

    #[test]
    fn test_label_translation_leaves_stored_default() {
        let option = color_option();
        let key = FieldKey {
            entity: ProductOption::ENTITY_NAME,
            entity_id: Some(7),
            field: "label",
        };
        let translations = InMemoryTranslations::new().with(key, "fr", "Couleur");
        let fr = TranslationContext::new("fr", Arc::new(translations));

        assert_eq!(option.label(&fr).as_deref(), Some("Couleur"));
        assert_eq!(option.main_entity_name(&fr), option.label(&fr));
        assert_eq!(option.stored_label(), Some("Color"));
    }

    #[test]
    fn test_main_entity_name_matches_label() {
        let option = color_option();
        let ctx = TranslationContext::untranslated("en");
        assert_eq!(option.main_entity_name(&ctx).as_deref(), Some("Color"));
        assert_eq!(
            AdminMainEntity::main_entity_name(&option, &ctx),
            option.label(&ctx)
        );
    }

    #[test]
    fn test_allowed_values_stay_ordered() {
        let mut option = ProductOption::new();
        option.set_allowed_values(vec![
            ProductOptionValue::new("Blue", 3),
            ProductOptionValue::new("Red", 1),
        ]);
        option.add_allowed_value(ProductOptionValue::new("Green", 2));
        option.add_allowed_value(ProductOptionValue::new("Black", 3));

        let names: Vec<_> = option
            .allowed_values()
            .iter()
            .filter_map(|v| v.attribute_value.as_deref())
            .collect();
        assert_eq!(names, ["Red", "Green", "Blue", "Black"]);
    }

    #[test]
    fn test_remove_allowed_values() {
        let mut option = ProductOption::new();
        option.set_allowed_values(vec![
            ProductOptionValue::new("Red", 1),
            ProductOptionValue::new("Blue", 2),
        ]);
        let removed = option.remove_allowed_values(|v| v.attribute_value.as_deref() == Some("Red"));
        assert_eq!(removed.len(), 1);
        assert_eq!(option.allowed_values().len(), 1);
    }

    #[test]
    fn test_product_references() {
        let mut option = ProductOption::new();
        assert!(option.add_product(ProductId(10)));
        assert!(!option.add_product(ProductId(10)));
        assert!(option.add_product(ProductId(11)));
        assert!(option.remove_product(ProductId(10)));
        assert!(!option.remove_product(ProductId(10)));
        assert_eq!(option.products(), &[ProductId(11)]);
    }

    #[test]
    fn test_serde_keeps_unset_flag() {
        let mut option = ProductOption::new();
        option.set_required(false);
        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["use_in_sku_generation"], serde_json::Value::Null);
        assert_eq!(json["required"], serde_json::Value::Bool(false));

        let back: ProductOption = serde_json::from_value(json).unwrap();
        assert!(back.use_in_sku_generation_state().is_unset());
        assert_eq!(back.required(), TriState::False);
    }

    #[test]
    fn test_deserialize_sorts_allowed_values() {
        let option: ProductOption = serde_json::from_value(serde_json::json!({
            "allowed_values": [
                { "attribute_value": "L", "display_order": 3 },
                { "attribute_value": "S", "display_order": 1 }
            ]
        }))
        .unwrap();

        let orders: Vec<_> = option
            .allowed_values()
            .iter()
            .map(|v| v.display_order)
            .collect();
        assert_eq!(orders, [Some(1), Some(3)]);
    }

    #[test]
    fn test_set_products_drops_repeats() {
        let mut option = ProductOption::new();
        option.set_products(vec![ProductId(7), ProductId(3), ProductId(7)]);
        assert_eq!(option.products(), &[ProductId(7), ProductId(3)]);

        let option: ProductOption =
            serde_json::from_value(serde_json::json!({ "products": [5, 5, 6] })).unwrap();
        assert_eq!(option.products(), &[ProductId(5), ProductId(6)]);
    }
}
