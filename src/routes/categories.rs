use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        categories::{CategoryInput, CategoryList, CategoryWrite},
        products::{ProductList, WriteMode},
    },
    error::AppResult,
    middleware::{
        auth::AuthUser,
        json::{ApiJson, PathId},
    },
    models::Category,
    response::{ApiResponse, Meta},
    routes::params::CategoryQuery,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list_categories).post(create_category))
        .route(
            "/categories/{id}/",
            get(get_category)
                .put(replace_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .route("/categories/{id}/products/", get(category_products))
}

#[utoipa::path(
    get,
    path = "/api/categories/",
    params(CategoryQuery),
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let (items, meta) = category_service::list_categories(&state, &query).await?;
    Ok(Json(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<Category>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = category_service::get_category(&state, id).await?;
    Ok(Json(ApiResponse::success("Category", category, None)))
}

#[utoipa::path(
    post,
    path = "/api/categories/",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Create category", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<CategoryWrite>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let category = category_service::create_category(&state, Some(user.user_id), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Category created",
            category,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}/",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Replaced category", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn replace_category(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ApiJson(payload): ApiJson<CategoryWrite>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = category_service::update_category(
        &state,
        Some(user.user_id),
        id,
        payload,
        WriteMode::Replace,
    )
    .await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        category,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/categories/{id}/",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Partially updated category", body = ApiResponse<Category>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn patch_category(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ApiJson(payload): ApiJson<CategoryWrite>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let category = category_service::update_category(
        &state,
        Some(user.user_id),
        id,
        payload,
        WriteMode::Partial,
    )
    .await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        category,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}/",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Deleted category; its products keep existing without a category"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    category_service::delete_category(&state, Some(user.user_id), id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/products/",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products in the category", body = ApiResponse<ProductList>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn category_products(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = category_service::category_products(&state, id).await?;
    let meta = Meta::total(items.len() as i64);
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}
