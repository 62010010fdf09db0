mod common;

use axum::http::{StatusCode, header};
use common::{app, body_text, form_request, json_request, send, setup_state, unique};
use product_catalog::{dto::products::ProductWrite, services::product_service};
use rust_decimal::Decimal;

#[tokio::test]
async fn root_redirects_permanently_to_products() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let response = send(&app(&state), json_request("GET", "/", None, None)).await?;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/products/");
    Ok(())
}

#[tokio::test]
async fn create_form_redirects_to_detail() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let name = unique("Kettle");
    let body = format!("name={}&price=35.00&stock=4&is_active=on", name.replace(' ', "+"));

    let response = send(&app, form_request("/products/", &body)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str()?.to_string();
    assert!(location.starts_with("/products/"));

    let response = send(&app, json_request("GET", &location, None, None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await?;
    assert!(html.contains(&name));
    assert!(html.contains("35.00"));
    Ok(())
}

#[tokio::test]
async fn invalid_edit_rerenders_without_saving() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let name = unique("Toaster");
    let product = product_service::create_product(
        &state,
        None,
        ProductWrite {
            name: Some(name.clone()),
            price: Some(Decimal::new(4999, 2)),
            stock: Some(3),
            ..Default::default()
        },
    )
    .await?;

    let response = send(
        &app,
        form_request(
            &format!("/products/{}/edit/", product.id),
            "name=Renamed&price=1.999&stock=3",
        ),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await?;
    assert!(html.contains("Ensure that there are no more than 2 decimal places."));

    let unchanged = product_service::get_product(&state, product.id).await?;
    assert_eq!(unchanged.name, name);
    assert_eq!(unchanged.price, Decimal::new(4999, 2));
    Ok(())
}

#[tokio::test]
async fn deleted_product_detail_is_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);
    let product = product_service::create_product(
        &state,
        None,
        ProductWrite {
            name: Some(unique("Blender")),
            price: Some(Decimal::new(8900, 2)),
            ..Default::default()
        },
    )
    .await?;

    let response = send(&app, form_request(&format!("/products/{}/delete/", product.id), "")).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/products/");

    let response = send(&app, json_request("GET", &format!("/products/{}/", product.id), None, None)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await?.contains("No product found"));
    Ok(())
}

#[tokio::test]
async fn unparseable_page_ids_render_not_found() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let app = app(&state);

    for uri in ["/products/abc/", "/products/99999999999/edit/"] {
        let response = send(&app, json_request("GET", uri, None, None)).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let content_type = response.headers()[header::CONTENT_TYPE].to_str()?.to_string();
        assert!(content_type.starts_with("text/html"), "{uri}");
        assert!(body_text(response).await?.contains("No product found"), "{uri}");
    }

    let response = send(&app, form_request("/products/abc/delete/", "")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
