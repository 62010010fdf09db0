mod common;

use axum::http::StatusCode;
use common::{app, body_json, create_user, json_request, send, setup_state, unique};
use serde_json::{Value, json};
use uuid::Uuid;

async fn create_product(app: &axum::Router, token: &str, body: Value) -> anyhow::Result<Value> {
    let response = send(app, json_request("POST", "/api/products/", Some(token), Some(body))).await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    Ok(body_json(response).await?["data"].clone())
}

fn names(listing: &Value) -> Vec<String> {
    listing["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// Anonymous writes are refused; an authenticated create is then retrievable by id.
#[tokio::test]
async fn create_requires_auth_and_is_retrievable() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;
    let name = unique("Widget");
    let body = json!({ "name": name, "price": "19.99", "stock": 5 });

    let response = send(&app, json_request("POST", "/api/products/", None, Some(body.clone()))).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let created = create_product(&app, &token, body).await?;
    assert_eq!(created["price"], "19.99");
    assert_eq!(created["is_active"], true);
    assert_eq!(created["is_featured"], false);
    assert_eq!(created["category"], Value::Null);

    let id = created["id"].as_i64().expect("id");
    let response = send(&app, json_request("GET", &format!("/api/products/{id}/"), None, None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await?;
    assert_eq!(fetched["data"]["name"], name.as_str());
    assert_eq!(fetched["data"]["stock"], 5);
    Ok(())
}

#[tokio::test]
async fn duplicate_name_is_a_field_error() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;
    let name = unique("Gadget");

    create_product(&app, &token, json!({ "name": name, "price": "5.00" })).await?;

    let response = send(
        &app,
        json_request("POST", "/api/products/", Some(&token), Some(json!({ "name": name, "price": "6.00" }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["data"]["name"][0], "product with this name already exists.");

    let tag = name.replace(' ', "%20");
    let response = send(&app, json_request("GET", &format!("/api/products/?search={tag}"), None, None)).await?;
    let listing = body_json(response).await?;
    assert_eq!(listing["meta"]["total"], 1);
    assert_eq!(listing["data"][0]["price"], "5.00");
    Ok(())
}

#[tokio::test]
async fn missing_required_fields_are_reported_together() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;

    let response = send(
        &app,
        json_request("POST", "/api/products/", Some(&token), Some(json!({ "price": "1.999" }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["data"]["name"][0], "This field is required.");
    assert_eq!(
        body["data"]["price"][0],
        "Ensure that there are no more than 2 decimal places."
    );
    Ok(())
}

#[tokio::test]
async fn patch_with_only_stock_keeps_other_fields() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;
    let name = unique("Lamp");
    let created = create_product(
        &app,
        &token,
        json!({ "name": name, "description": "Warm light", "price": "24.50", "stock": 2 }),
    )
    .await?;
    let id = created["id"].as_i64().expect("id");

    let response = send(
        &app,
        json_request("PATCH", &format!("/api/products/{id}/"), Some(&token), Some(json!({ "stock": 9 }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let patched = body_json(response).await?["data"].clone();
    assert_eq!(patched["stock"], 9);
    assert_eq!(patched["name"], name.as_str());
    assert_eq!(patched["description"], "Warm light");
    assert_eq!(patched["price"], "24.50");

    let response = send(
        &app,
        json_request("PUT", &format!("/api/products/{id}/"), Some(&token), Some(json!({ "stock": 1 }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn deleting_a_category_clears_product_links() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;

    let response = send(
        &app,
        json_request("POST", "/api/categories/", Some(&token), Some(json!({ "name": unique("Garden") }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await?["data"]["id"].as_i64().expect("id");

    let product = create_product(
        &app,
        &token,
        json!({ "name": unique("Hose"), "price": "12.00", "category_id": category_id }),
    )
    .await?;
    assert_eq!(product["category"]["id"], category_id);
    let product_id = product["id"].as_i64().expect("id");

    let response = send(
        &app,
        json_request("GET", &format!("/api/categories/{category_id}/products/"), None, None),
    )
    .await?;
    assert_eq!(names(&body_json(response).await?), vec![product["name"].as_str().unwrap_or_default().to_string()]);

    let response = send(
        &app,
        json_request("DELETE", &format!("/api/categories/{category_id}/"), Some(&token), None),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, json_request("GET", &format!("/api/products/{product_id}/"), None, None)).await?;
    assert_eq!(body_json(response).await?["data"]["category"], Value::Null);

    let response = send(
        &app,
        json_request("GET", &format!("/api/categories/{category_id}/products/"), None, None),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn search_matches_every_term_and_ordering_applies() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;
    let tag = Uuid::new_v4().simple().to_string();

    create_product(&app, &token, json!({ "name": format!("{tag} phone alpha"), "price": "10.00" })).await?;
    create_product(&app, &token, json!({ "name": format!("{tag} case"), "description": "fits any phone", "price": "30.00" })).await?;
    create_product(&app, &token, json!({ "name": format!("{tag} charger"), "price": "20.00" })).await?;

    let response = send(&app, json_request("GET", &format!("/api/products/?search={tag}%20phone&ordering=name"), None, None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await?;
    assert_eq!(names(&listing), vec![format!("{tag} case"), format!("{tag} phone alpha")]);
    assert_eq!(listing["meta"]["total"], 2);

    let response = send(&app, json_request("GET", &format!("/api/products/?search={}%20PHONE", tag.to_uppercase()), None, None)).await?;
    assert_eq!(body_json(response).await?["meta"]["total"], 2);

    let response = send(&app, json_request("GET", &format!("/api/products/?search={tag}&ordering=-price"), None, None)).await?;
    let prices: Vec<String> = body_json(response).await?["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|p| p["price"].as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    assert_eq!(prices, vec!["30.00", "20.00", "10.00"]);

    let response = send(&app, json_request("GET", &format!("/api/products/?search={tag}&price=20.00"), None, None)).await?;
    assert_eq!(names(&body_json(response).await?), vec![format!("{tag} charger")]);

    let response = send(&app, json_request("GET", &format!("/api/products/?search={tag}&ordering=name&page=1&per_page=2"), None, None)).await?;
    let page = body_json(response).await?;
    assert_eq!(names(&page).len(), 2);
    assert_eq!(page["meta"]["total"], 3);
    assert_eq!(page["meta"]["per_page"], 2);
    Ok(())
}

#[tokio::test]
async fn unknown_category_filter_is_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);

    let response = send(&app, json_request("GET", "/api/products/?category=abc", None, None)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert!(body["data"]["category"].is_array());
    Ok(())
}

#[tokio::test]
async fn toggling_twice_restores_featured_flag() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;
    let created = create_product(&app, &token, json!({ "name": unique("Speaker"), "price": "80.00" })).await?;
    let id = created["id"].as_i64().expect("id");
    let toggle = format!("/api/products/{id}/toggle_featured/");

    let response = send(&app, json_request("POST", &toggle, None, None)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, json_request("POST", &toggle, Some(&token), None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["data"]["status"], "featured status updated");

    let response = send(&app, json_request("GET", "/api/products/featured/", None, None)).await?;
    let featured = body_json(response).await?;
    assert!(featured["data"].as_array().is_some_and(|items| items.iter().any(|p| p["id"] == id)));

    send(&app, json_request("POST", &toggle, Some(&token), None)).await?;
    let response = send(&app, json_request("GET", &format!("/api/products/{id}/"), None, None)).await?;
    assert_eq!(body_json(response).await?["data"]["is_featured"], false);

    let response = send(&app, json_request("POST", "/api/products/2147483647/toggle_featured/", Some(&token), None)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn admin_console_requires_admin_role() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let user_token = create_user(&state, "user").await?;
    let admin_token = create_user(&state, "admin").await?;

    let response = send(&app, json_request("GET", "/admin/products/", None, None)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, json_request("GET", "/admin/products/", Some(&user_token), None)).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, json_request("GET", "/admin/products/", Some(&admin_token), None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await?;
    assert!(html.contains("Manage Products (Custom Admin)"));
    Ok(())
}

#[tokio::test]
async fn unknown_category_id_on_write_is_rejected() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/products/",
            Some(&token),
            Some(json!({ "name": unique("Orphan"), "price": "1.00", "category_id": 2147483647 })),
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(
        body["data"]["category_id"][0],
        "Invalid pk \"2147483647\" - object does not exist."
    );
    Ok(())
}

#[tokio::test]
async fn register_then_login_issues_a_token() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let email = format!("{}@Example.com", Uuid::new_v4().simple());
    let credentials = json!({ "email": email, "password": "correct-horse" });

    let response = send(&app, json_request("POST", "/api/auth/register", None, Some(credentials.clone()))).await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await?["data"].clone();
    assert_eq!(user["email"], email.to_lowercase().as_str());
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let response = send(&app, json_request("POST", "/api/auth/register", None, Some(credentials.clone()))).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, json_request("POST", "/api/auth/login", None, Some(credentials))).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await?["data"]["token"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    assert!(!token.is_empty());

    let response = send(
        &app,
        json_request("POST", "/api/products/", Some(&token), Some(json!({ "name": unique("Pen"), "price": "2.00" }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": email, "password": "wrong-pass" }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);

    for uri in [
        "/api/products/?page=9223372036854775807&per_page=100",
        "/api/categories/?page=9223372036854775807&per_page=100",
    ] {
        let response = send(&app, json_request("GET", uri, None, None)).await?;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_json(response).await?;
        assert_eq!(body["data"], json!([]), "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn unparseable_ids_are_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;

    for uri in [
        "/api/products/abc/",
        "/api/categories/99999999999/",
        "/api/categories/abc/products/",
    ] {
        let response = send(&app, json_request("GET", uri, None, None)).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await?["message"], "Not Found", "{uri}");
    }

    let response = send(
        &app,
        json_request("PATCH", "/api/products/abc/", Some(&token), Some(json!({ "stock": 1 }))),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, json_request("POST", "/api/products/abc/toggle_featured/", Some(&token), None)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_fields_are_field_errors() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let token = create_user(&state, "user").await?;

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/products/",
            Some(&token),
            Some(json!({ "name": unique("Stool"), "price": "abc", "stock": "x" })),
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["data"]["price"][0], "A valid number is required.");
    assert_eq!(body["data"]["stock"][0], "A valid integer is required.");

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/products/",
            Some(&token),
            Some(json!({ "name": unique("Stool"), "price": "10.000" })),
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let name = unique("Bench");
    let created = create_product(&app, &token, json!({ "name": name, "price": "40.00", "stock": 3 })).await?;
    let id = created["id"].as_i64().expect("id");

    let response = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/products/{id}/"),
            Some(&token),
            Some(json!({ "name": null, "price": null, "stock": null })),
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    for field in ["name", "price", "stock"] {
        assert_eq!(body["data"][field][0], "This field may not be null.", "{field}");
    }

    let response = send(&app, json_request("GET", &format!("/api/products/{id}/"), None, None)).await?;
    let unchanged = body_json(response).await?["data"].clone();
    assert_eq!(unchanged["name"], name.as_str());
    assert_eq!(unchanged["price"], "40.00");
    assert_eq!(unchanged["stock"], 3);
    Ok(())
}
