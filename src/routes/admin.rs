//! Administrative console pages; every page requires an admin bearer token.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::{
    error::{AppError, AppResult},
    forms::ProductForm,
    middleware::auth::AuthUser,
    routes::{
        pages::into_page,
        params::{AdminCategoryQuery, AdminProductQuery},
    },
    services::{admin_service, category_service},
    state::AppState,
    templates::{AdminCategoryListPage, AdminIndexPage, AdminProductListPage},
};

pub const PRODUCT_CHANGELIST_TITLE: &str = "Manage Products (Custom Admin)";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/", get(admin_index))
        .route("/admin/products/", get(product_changelist))
        .route("/admin/categories/", get(category_changelist))
}

pub async fn admin_index(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
) -> Response {
    let result = render_index(&state, user).await;
    into_page(&state, result)
}

pub async fn product_changelist(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    Query(query): Query<AdminProductQuery>,
) -> Response {
    let result = render_product_changelist(&state, user, query).await;
    into_page(&state, result)
}

pub async fn category_changelist(
    State(state): State<AppState>,
    user: Result<AuthUser, AppError>,
    Query(query): Query<AdminCategoryQuery>,
) -> Response {
    let result = render_category_changelist(&state, user, query).await;
    into_page(&state, result)
}

async fn render_index(state: &AppState, user: Result<AuthUser, AppError>) -> AppResult<Response> {
    let user = user?;
    let page = AdminIndexPage {
        site: state.site().clone(),
        title: state.site().index_title.clone(),
        entries: admin_service::recent_actions(state, &user).await?,
    };
    Ok(Html(page.render()?).into_response())
}

async fn render_product_changelist(
    state: &AppState,
    user: Result<AuthUser, AppError>,
    query: AdminProductQuery,
) -> AppResult<Response> {
    let user = user?;
    let (products, meta) = admin_service::product_changelist(state, &user, &query).await?;
    let page = AdminProductListPage {
        site: state.site().clone(),
        title: PRODUCT_CHANGELIST_TITLE.to_string(),
        products,
        categories: category_service::all_categories(state).await?,
        form: ProductForm::new(),
        search: query.q.unwrap_or_default(),
        page: meta.page.unwrap_or(1),
        total: meta.total.unwrap_or_default(),
    };
    Ok(Html(page.render()?).into_response())
}

async fn render_category_changelist(
    state: &AppState,
    user: Result<AuthUser, AppError>,
    query: AdminCategoryQuery,
) -> AppResult<Response> {
    let user = user?;
    let page = AdminCategoryListPage {
        site: state.site().clone(),
        title: "Categories".to_string(),
        categories: admin_service::category_changelist(state, &user, &query).await?,
        search: query.q.unwrap_or_default(),
    };
    Ok(Html(page.render()?).into_response())
}
