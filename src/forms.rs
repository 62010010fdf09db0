//! HTML form for creating and editing products.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::{
    dto::products::{REQUIRED, ProductWrite, validate_price},
    error::{FieldErrors, push_field_error},
    models::{Category, Product},
};

/// Input widget used to render a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    TextInput,
    Textarea,
    NumberInput,
    Select,
    CheckboxInput,
}

impl Widget {
    pub fn css_class(self) -> &'static str {
        match self {
            Widget::CheckboxInput => "form-check-input",
            Widget::TextInput | Widget::Textarea | Widget::NumberInput | Widget::Select => {
                "form-control"
            }
        }
    }
}

/// Product form fields in display order with their widgets.
pub const PRODUCT_FIELDS: [(&str, Widget); 6] = [
    ("name", Widget::TextInput),
    ("description", Widget::Textarea),
    ("price", Widget::NumberInput),
    ("stock", Widget::NumberInput),
    ("category", Widget::Select),
    ("is_active", Widget::CheckboxInput),
];

/// Submitted (or initial) values of the product form, kept as text so an
/// invalid submission can be shown back unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub is_active: bool,
    #[serde(skip)]
    pub errors: FieldErrors,
}

impl ProductForm {
    /// Unbound form with the model defaults.
    pub fn new() -> Self {
        Self {
            stock: "0".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product
                .category
                .as_ref()
                .map(|c| c.id.to_string())
                .unwrap_or_default(),
            is_active: product.is_active,
            errors: FieldErrors::new(),
        }
    }

    /// Validate the submission into a complete write.
    pub fn clean(&self) -> Result<ProductWrite, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            push_field_error(&mut errors, "name", REQUIRED);
        } else if name.chars().count() > 255 {
            push_field_error(
                &mut errors,
                "name",
                "Ensure this value has at most 255 characters.",
            );
        }

        let description = self.description.trim();
        let description = (!description.is_empty()).then(|| description.to_string());

        let price = match self.price.trim() {
            "" => {
                push_field_error(&mut errors, "price", REQUIRED);
                None
            }
            raw => match raw.parse::<Decimal>() {
                Ok(price) => match validate_price(&price) {
                    Ok(()) => Some(price),
                    Err(e) => {
                        let message = e
                            .message
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Enter a number.".to_string());
                        push_field_error(&mut errors, "price", message);
                        None
                    }
                },
                Err(_) => {
                    push_field_error(&mut errors, "price", "Enter a number.");
                    None
                }
            },
        };

        let stock = match self.stock.trim() {
            "" => {
                push_field_error(&mut errors, "stock", REQUIRED);
                None
            }
            raw => match raw.parse::<i32>() {
                Ok(stock) => Some(stock),
                Err(_) => {
                    push_field_error(&mut errors, "stock", "Enter a whole number.");
                    None
                }
            },
        };

        let category = match self.category.trim() {
            "" => Some(None),
            raw => match raw.parse::<i32>() {
                Ok(id) => Some(Some(id)),
                Err(_) => {
                    push_field_error(&mut errors, "category", INVALID_CHOICE);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductWrite {
            name: Some(name.to_string()),
            description: Some(description),
            price,
            stock,
            category_id: category,
            is_active: Some(self.is_active),
            rejected: FieldErrors::new(),
        })
    }

    /// Attach errors raised while saving; `category_id` is reported on `category`.
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        for (field, messages) in errors {
            let field = match field.as_str() {
                "category_id" => "category".to_string(),
                _ => field,
            };
            for message in messages {
                let message = if field == "category" {
                    INVALID_CHOICE.to_string()
                } else {
                    message
                };
                push_field_error(&mut self.errors, &field, message);
            }
        }
        self
    }

    pub fn css_class(&self, field: &str) -> &'static str {
        PRODUCT_FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, widget)| widget.css_class())
            .unwrap_or("form-control")
    }

    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_selected(&self, category: &Category) -> bool {
        self.category.trim() == category.id.to_string()
    }
}

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.is_some_and(|v| !matches!(v.as_str(), "" | "false" | "0" | "off")))
}
