//! Admin presentation metadata.
//!
//! Describes how an admin form generator should present product options: friendly
//! names, help text, grouping, field types and collection add semantics. Only the
//! metadata lives here; rendering belongs to whatever consumes it.

use crate::i18n::TranslationContext;
use serde::Serialize;

/// Entity that can name itself in generic admin listings.
pub trait AdminMainEntity {
    fn main_entity_name(&self, ctx: &TranslationContext) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportedFieldType {
    Default,
    /// Drop-down backed by a closed code table.
    BroadleafEnumeration,
}

/// How new members are added to an admin collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddMethodType {
    /// Members are created inline and persisted with the owner.
    Persist,
    /// Members are looked up from existing records.
    Lookup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPresentation {
    pub field: &'static str,
    pub friendly_name: &'static str,
    pub help_text: Option<&'static str>,
    pub group: Option<&'static str>,
    pub field_type: SupportedFieldType,
    /// Code table backing an enumeration field.
    pub enumeration: Option<&'static str>,
    /// Shown in list grids.
    pub prominent: bool,
    pub translatable: bool,
}

impl FieldPresentation {
    const fn new(field: &'static str, friendly_name: &'static str) -> Self {
        Self {
            field,
            friendly_name,
            help_text: None,
            group: None,
            field_type: SupportedFieldType::Default,
            enumeration: None,
            prominent: false,
            translatable: false,
        }
    }

    const fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = Some(help_text);
        self
    }

    const fn group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }

    const fn enumeration(mut self, table: &'static str) -> Self {
        self.field_type = SupportedFieldType::BroadleafEnumeration;
        self.enumeration = Some(table);
        self
    }

    const fn prominent(mut self) -> Self {
        self.prominent = true;
        self
    }

    const fn translatable(mut self) -> Self {
        self.translatable = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionPresentation {
    pub field: &'static str,
    pub friendly_name: &'static str,
    pub add_type: AddMethodType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassPresentation {
    pub friendly_name: &'static str,
    /// Whether to-one relations are populated when the form is built.
    pub populate_to_one_fields: bool,
    pub fields: &'static [FieldPresentation],
    pub collections: &'static [CollectionPresentation],
}

impl ClassPresentation {
    pub fn field(&self, name: &str) -> Option<&FieldPresentation> {
        self.fields.iter().find(|f| f.field == name)
    }

    /// Fields belonging to `group`, in declaration order.
    pub fn group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a FieldPresentation> + 'a {
        self.fields.iter().filter(move |f| f.group == Some(group))
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

pub const VALIDATION_GROUP: &str = "productOption_validation";

const PRODUCT_OPTION_FIELDS: &[FieldPresentation] = &[
    FieldPresentation::new("type", "productOption_Type")
        .enumeration("ProductOptionType"),
    FieldPresentation::new("attribute_name", "productOption_name")
        .help("productOption_nameHelp"),
    FieldPresentation::new("label", "productOption_Label")
        .help("productOption_labelHelp")
        .prominent()
        .translatable(),
    FieldPresentation::new("required", "productOption_Required"),
    FieldPresentation::new("use_in_sku_generation", "productOption_UseInSKUGeneration"),
    FieldPresentation::new("display_order", "productOption_displayOrder"),
    FieldPresentation::new("validation_type", "productOption_validationType")
        .group(VALIDATION_GROUP)
        .enumeration("ProductOptionValidationType"),
    FieldPresentation::new("validation_string", "productOption_validationSring")
        .group(VALIDATION_GROUP),
    FieldPresentation::new("error_code", "productOption_errorCode").group(VALIDATION_GROUP),
    FieldPresentation::new("error_message", "productOption_errorMessage")
        .group(VALIDATION_GROUP),
];

const PRODUCT_OPTION_COLLECTIONS: &[CollectionPresentation] = &[CollectionPresentation {
    field: "allowed_values",
    friendly_name: "ProductOptionImpl_Allowed_Values",
    add_type: AddMethodType::Persist,
}];

/// Presentation metadata for [`ProductOption`](crate::ProductOption).
pub static PRODUCT_OPTION: ClassPresentation = ClassPresentation {
    friendly_name: "ProductOptionImpl_baseProductOption",
    populate_to_one_fields: true,
    fields: PRODUCT_OPTION_FIELDS,
    collections: PRODUCT_OPTION_COLLECTIONS,
};
