use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::{as_string, convert};
use crate::{
    dto::products::{NOT_A_STRING, REQUIRED, WriteMode, not_blank},
    error::{FieldErrors, field_errors_from, push_field_error},
    models::Category,
};

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct CategoryInput {
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "super::raw")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(from = "CategoryInput")]
pub struct CategoryWrite {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub rejected: FieldErrors,
}

impl From<CategoryInput> for CategoryWrite {
    fn from(input: CategoryInput) -> Self {
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
        Self {
            name: name.flatten(),
            description,
            rejected,
        }
    }
}

impl CategoryWrite {
    pub fn normalized(mut self) -> Self {
        if let Some(name) = self.name.as_mut() {
            *name = name.trim().to_string();
        }
        self
    }

    pub fn check(&self, mode: WriteMode) -> FieldErrors {
        let mut errors = self.rejected.clone();
        if let Err(e) = self.validate() {
            for (field, messages) in field_errors_from(&e) {
                errors.entry(field).or_default().extend(messages);
            }
        }
        if mode != WriteMode::Partial && self.name.is_none() && !errors.contains_key("name") {
            push_field_error(&mut errors, "name", REQUIRED);
        }
        errors
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
