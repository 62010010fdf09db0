use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{FieldErrors, push_field_error};

pub mod auth;
pub mod categories;
pub mod products;

pub const NOT_NULL: &str = "This field may not be null.";

/// Keeps a present field as its raw JSON value, `null` included.
pub(crate) fn raw<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Convert one raw body field. `None` when the field is absent or rejected,
/// `Some(None)` for a `null` the field accepts. Rejections land in `errors`.
pub(crate) fn convert<T>(
    raw: Option<Value>,
    field: &str,
    nullable: bool,
    parse: fn(Value) -> Option<T>,
    invalid: &str,
    errors: &mut FieldErrors,
) -> Option<Option<T>> {
    match raw {
        None => None,
        Some(Value::Null) if nullable => Some(None),
        Some(Value::Null) => {
            push_field_error(errors, field, NOT_NULL);
            None
        }
        Some(value) => match parse(value) {
            Some(parsed) => Some(Some(parsed)),
            None => {
                push_field_error(errors, field, invalid);
                None
            }
        },
    }
}

pub(crate) fn as_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn as_integer(value: Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decimal with the scale exactly as written, so `10.000` keeps three places.
pub(crate) fn as_decimal(value: Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

pub(crate) fn as_bool(value: Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
