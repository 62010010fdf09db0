//! Server-rendered product pages.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    dto::products::WriteMode,
    error::{AppError, AppResult},
    forms::ProductForm,
    middleware::json::PathId,
    models::Product,
    services::{category_service, product_service},
    state::AppState,
    templates::{ErrorPage, ProductDetailPage, ProductEditPage, ProductListPage},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/", get(product_list).post(product_create))
        .route("/products/{id}/", get(product_detail))
        .route("/products/{id}/edit/", get(product_edit).post(product_update))
        .route("/products/{id}/delete/", post(product_delete))
}

pub async fn product_list(State(state): State<AppState>) -> Response {
    let result = render_list(&state, ProductForm::new(), StatusCode::OK).await;
    into_page(&state, result)
}

pub async fn product_create(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    let result = match form.clean() {
        Err(errors) => {
            render_list(&state, form.with_errors(errors), StatusCode::BAD_REQUEST).await
        }
        Ok(write) => match product_service::create_product(&state, None, write).await {
            Ok(product) => Ok(redirect_to_detail(product.id)),
            Err(AppError::Validation(errors)) => {
                render_list(&state, form.with_errors(errors), StatusCode::BAD_REQUEST).await
            }
            Err(err) => Err(err),
        },
    };
    into_page(&state, result)
}

pub async fn product_detail(
    State(state): State<AppState>,
    id: Result<PathId, AppError>,
) -> Response {
    let result = render_detail(&state, id).await;
    into_page(&state, result)
}

pub async fn product_edit(
    State(state): State<AppState>,
    id: Result<PathId, AppError>,
) -> Response {
    let result = open_edit(&state, id).await;
    into_page(&state, result)
}

pub async fn product_update(
    State(state): State<AppState>,
    id: Result<PathId, AppError>,
    Form(form): Form<ProductForm>,
) -> Response {
    let result = save_edit(&state, id, form).await;
    into_page(&state, result)
}

pub async fn product_delete(
    State(state): State<AppState>,
    id: Result<PathId, AppError>,
) -> Response {
    let result = delete(&state, id).await;
    into_page(&state, result)
}

async fn render_detail(state: &AppState, id: Result<PathId, AppError>) -> AppResult<Response> {
    let PathId(id) = id?;
    let product = product_service::get_product(state, id).await?;
    let page = ProductDetailPage {
        site: state.site().clone(),
        title: product.name.clone(),
        product,
    };
    Ok(Html(page.render()?).into_response())
}

/// Validate and save the edit form; nothing is written when any field fails.
async fn save_edit(
    state: &AppState,
    id: Result<PathId, AppError>,
    form: ProductForm,
) -> AppResult<Response> {
    let PathId(id) = id?;
    let product = product_service::get_product(state, id).await?;
    let write = match form.clean() {
        Ok(write) => write,
        Err(errors) => {
            return render_edit(state, product, form.with_errors(errors), StatusCode::BAD_REQUEST)
                .await;
        }
    };
    match product_service::update_product(state, None, id, write, WriteMode::Replace).await {
        Ok(updated) => Ok(redirect_to_detail(updated.id)),
        Err(AppError::Validation(errors)) => {
            render_edit(state, product, form.with_errors(errors), StatusCode::BAD_REQUEST).await
        }
        Err(err) => Err(err),
    }
}

async fn open_edit(state: &AppState, id: Result<PathId, AppError>) -> AppResult<Response> {
    let PathId(id) = id?;
    let product = product_service::get_product(state, id).await?;
    let form = ProductForm::from_product(&product);
    render_edit(state, product, form, StatusCode::OK).await
}

async fn delete(state: &AppState, id: Result<PathId, AppError>) -> AppResult<Response> {
    let PathId(id) = id?;
    product_service::delete_product(state, None, id).await?;
    Ok(Redirect::to("/products/").into_response())
}

async fn render_list(state: &AppState, form: ProductForm, status: StatusCode) -> AppResult<Response> {
    let page = ProductListPage {
        site: state.site().clone(),
        title: "Products".to_string(),
        products: product_service::all_products(state).await?,
        categories: category_service::all_categories(state).await?,
        form,
    };
    Ok((status, Html(page.render()?)).into_response())
}

async fn render_edit(
    state: &AppState,
    product: Product,
    form: ProductForm,
    status: StatusCode,
) -> AppResult<Response> {
    let page = ProductEditPage {
        site: state.site().clone(),
        title: format!("Edit {}", product.name),
        categories: category_service::all_categories(state).await?,
        product,
        form,
    };
    Ok((status, Html(page.render()?)).into_response())
}

fn redirect_to_detail(id: i32) -> Response {
    Redirect::to(&format!("/products/{id}/")).into_response()
}

/// Turn a page result into a response, rendering failures as an HTML error page.
pub fn into_page(state: &AppState, result: AppResult<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => error_page(state, err),
    }
}

pub fn error_page(state: &AppState, err: AppError) -> Response {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(error = ?err, "page failed");
    }
    let message = match &err {
        AppError::NotFound => "No product found matching the query.".to_string(),
        AppError::Unauthorized => "Authentication credentials were not provided.".to_string(),
        AppError::Forbidden => "You do not have permission to view this page.".to_string(),
        AppError::BadRequest(msg) => msg.clone(),
        _ if status.is_server_error() => "Something went wrong.".to_string(),
        other => other.to_string(),
    };
    let page = ErrorPage {
        site: state.site().clone(),
        title: status.canonical_reason().unwrap_or("Error").to_string(),
        status: status.as_u16(),
        message,
    };
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(render_err) => {
            tracing::error!(error = %render_err, "error page failed to render");
            (status, page.message).into_response()
        }
    }
}
