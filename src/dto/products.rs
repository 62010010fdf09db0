use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{as_bool, as_decimal, as_integer, as_string, convert};
use crate::{
    error::{FieldErrors, field_errors_from, push_field_error},
    models::Product,
};

pub const REQUIRED: &str = "This field is required.";
pub(crate) const NOT_A_STRING: &str = "Not a valid string.";

/// How much of the write representation a request must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Replace,
    Partial,
}

/// Product body as sent. Each field is kept raw so a wrongly typed or null
/// value is reported against that field alone.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<String>, example = "19.99")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<i32>)]
    pub stock: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<bool>)]
    pub is_active: Option<Value>,
}

/// Write view of a product. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(from = "ProductInput")]
pub struct ProductWrite {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "Ensure this field has no more than 255 characters.")
    )]
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub category_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    /// Fields the body carried with an unusable value.
    pub rejected: FieldErrors,
}

impl From<ProductInput> for ProductWrite {
    fn from(input: ProductInput) -> Self {
        let mut rejected = FieldErrors::new();
        let name = convert(input.name, "name", false, as_string, NOT_A_STRING, &mut rejected);
        let description = convert(
            input.description,
            "description",
            true,
            as_string,
            NOT_A_STRING,
            &mut rejected,
        );
        let price = convert(
            input.price,
            "price",
            false,
            as_decimal,
            "A valid number is required.",
            &mut rejected,
        );
        let stock = convert(
            input.stock,
            "stock",
            false,
            as_integer,
            "A valid integer is required.",
            &mut rejected,
        );
        let category_id = convert(
            input.category_id,
            "category_id",
            true,
            as_integer,
            "Incorrect type. Expected pk value.",
            &mut rejected,
        );
        let is_active = convert(
            input.is_active,
            "is_active",
            false,
            as_bool,
            "Must be a valid boolean.",
            &mut rejected,
        );

        Self {
            name: name.flatten(),
            description,
            price: price.flatten(),
            stock: stock.flatten(),
            category_id,
            is_active: is_active.flatten(),
            rejected,
        }
    }
}

impl ProductWrite {
    pub fn normalized(mut self) -> Self {
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
        self
    }

    /// Field-level errors for this payload under the given mode.
    pub fn check(&self, mode: WriteMode) -> FieldErrors {
        let mut errors = self.rejected.clone();
        if let Err(e) = self.validate() {
            for (field, messages) in field_errors_from(&e) {
                errors.entry(field).or_default().extend(messages);
            }
        }
        if mode != WriteMode::Partial {
            for (field, missing) in [("name", self.name.is_none()), ("price", self.price.is_none())] {
                if missing && !errors.contains_key(field) {
                    push_field_error(&mut errors, field, REQUIRED);
                }
            }
        }
        errors
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("This field may not be blank.")));
    }
    Ok(())
}

/// Prices hold at most ten digits, two of them after the decimal point.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.scale() > 2 {
        return Err(ValidationError::new("decimal_places").with_message(Cow::Borrowed(
            "Ensure that there are no more than 2 decimal places.",
        )));
    }
    if price.trunc().abs() >= Decimal::from(100_000_000) {
        return Err(ValidationError::new("max_digits").with_message(Cow::Borrowed(
            "Ensure that there are no more than 8 digits before the decimal point.",
        )));
    }
    Ok(())
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
