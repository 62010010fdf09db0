use product_catalog::{
    dto::products::{ProductWrite, REQUIRED, WriteMode, validate_price},
    error::FieldErrors,
    forms::{ProductForm, Widget},
};
use rust_decimal::Decimal;
use serde_json::json;

fn filled_form() -> ProductForm {
    ProductForm {
        name: "  Desk Lamp ".into(),
        description: "".into(),
        price: "24.50".into(),
        stock: "7".into(),
        category: "".into(),
        is_active: true,
        ..Default::default()
    }
}

#[test]
fn clean_builds_a_complete_write() {
    let write = filled_form().clean().expect("valid form");
    assert_eq!(write.name.as_deref(), Some("Desk Lamp"));
    assert_eq!(write.description, Some(None));
    assert_eq!(write.price, Some(Decimal::new(2450, 2)));
    assert_eq!(write.stock, Some(7));
    assert_eq!(write.category_id, Some(None));
    assert_eq!(write.is_active, Some(true));
}

#[test]
fn clean_reports_missing_price() {
    let form = ProductForm {
        price: "".into(),
        ..filled_form()
    };
    let errors = form.clean().expect_err("price is required");
    assert_eq!(errors["price"], vec![REQUIRED.to_string()]);
    assert!(!errors.contains_key("name"));
}

#[test]
fn clean_rejects_three_decimal_places() {
    let form = ProductForm {
        price: "1.999".into(),
        ..filled_form()
    };
    let errors = form.clean().expect_err("too many decimals");
    assert_eq!(
        errors["price"],
        vec!["Ensure that there are no more than 2 decimal places.".to_string()]
    );
}

#[test]
fn clean_collects_every_bad_field() {
    let form = ProductForm {
        name: "   ".into(),
        price: "abc".into(),
        stock: "1.5".into(),
        category: "x".into(),
        ..filled_form()
    };
    let errors = form.clean().expect_err("invalid form");
    let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    assert_eq!(fields, vec!["category", "name", "price", "stock"]);
}

#[test]
fn unchecked_checkbox_is_false() {
    let form: ProductForm =
        serde_json::from_value(serde_json::json!({ "name": "Mug", "price": "3" }))
            .expect("form without checkbox");
    assert!(!form.is_active);

    let form: ProductForm =
        serde_json::from_value(serde_json::json!({ "name": "Mug", "is_active": "on" }))
            .expect("form with checkbox");
    assert!(form.is_active);
}

#[test]
fn widgets_carry_bootstrap_classes() {
    let form = ProductForm::new();
    assert_eq!(form.css_class("name"), "form-control");
    assert_eq!(form.css_class("category"), "form-control");
    assert_eq!(form.css_class("is_active"), "form-check-input");
    assert_eq!(Widget::Textarea.css_class(), "form-control");
    assert_eq!(form.stock, "0");
    assert!(form.is_active);
}

#[test]
fn save_errors_on_category_id_show_on_category() {
    let mut errors = FieldErrors::new();
    errors.insert(
        "category_id".into(),
        vec!["Invalid pk \"99\" - object does not exist.".into()],
    );
    errors.insert("name".into(), vec!["product with this name already exists.".into()]);

    let form = ProductForm::new().with_errors(errors);
    assert!(form.has_errors());
    assert!(form.errors_for("category_id").is_empty());
    assert_eq!(
        form.errors_for("category"),
        ["Select a valid choice. That choice is not one of the available choices.".to_string()]
    );
    assert_eq!(
        form.errors_for("name"),
        ["product with this name already exists.".to_string()]
    );
}

#[test]
fn partial_writes_need_no_required_fields() {
    let write = ProductWrite {
        stock: Some(3),
        ..Default::default()
    };
    assert!(write.check(WriteMode::Partial).is_empty());

    let errors = write.check(WriteMode::Create);
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("price"));
}

#[test]
fn blank_name_is_rejected_even_when_partial() {
    let write = ProductWrite {
        name: Some("  ".into()),
        ..Default::default()
    };
    let errors = write.check(WriteMode::Partial);
    assert_eq!(errors["name"], vec!["This field may not be blank.".to_string()]);
}

#[test]
fn price_precision_limits() {
    assert!(validate_price(&Decimal::new(1999, 2)).is_ok());
    assert!(validate_price(&Decimal::new(99_999_999_99, 2)).is_ok());
    assert!(validate_price(&Decimal::new(1999, 3)).is_err());
    // Trailing zeros still count as decimal places.
    assert!(validate_price(&Decimal::new(10_000, 3)).is_err());
    assert!(validate_price(&Decimal::new(100_000_000, 0)).is_err());
}

#[test]
fn wrongly_typed_body_fields_are_reported_per_field() {
    let write: ProductWrite = serde_json::from_value(json!({
        "name": "Chair",
        "price": "abc",
        "stock": "x",
        "is_active": "maybe",
        "category_id": [1]
    }))
    .expect("body deserializes");

    let errors = write.check(WriteMode::Create);
    assert_eq!(errors["price"], vec!["A valid number is required.".to_string()]);
    assert_eq!(errors["stock"], vec!["A valid integer is required.".to_string()]);
    assert_eq!(errors["is_active"], vec!["Must be a valid boolean.".to_string()]);
    assert_eq!(errors["category_id"], vec!["Incorrect type. Expected pk value.".to_string()]);
    assert!(!errors.contains_key("name"));
}

#[test]
fn null_is_only_accepted_on_nullable_fields() {
    let write: ProductWrite = serde_json::from_value(json!({
        "name": null,
        "price": null,
        "stock": null,
        "is_active": null,
        "description": null,
        "category_id": null
    }))
    .expect("body deserializes");

    let errors = write.check(WriteMode::Partial);
    for field in ["name", "price", "stock", "is_active"] {
        assert_eq!(errors[field], vec!["This field may not be null.".to_string()], "{field}");
    }
    assert!(!errors.contains_key("description"));
    assert!(!errors.contains_key("category_id"));
    assert_eq!(write.description, Some(None));
    assert_eq!(write.category_id, Some(None));
}

#[test]
fn body_values_convert_to_a_write() {
    let write: ProductWrite = serde_json::from_value(json!({
        "name": "Chair",
        "price": 12.5,
        "stock": "4",
        "is_active": false
    }))
    .expect("body deserializes");

    assert!(write.check(WriteMode::Create).is_empty());
    assert_eq!(write.price, Some(Decimal::new(125, 1)));
    assert_eq!(write.stock, Some(4));
    assert_eq!(write.is_active, Some(false));
    assert_eq!(write.description, None);
}

#[test]
fn price_keeps_written_scale() {
    let write: ProductWrite =
        serde_json::from_value(json!({ "name": "Chair", "price": "10.000" })).expect("body");
    assert_eq!(
        write.check(WriteMode::Create)["price"],
        vec!["Ensure that there are no more than 2 decimal places.".to_string()]
    );
}
