use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::products::{ProductInput, ProductList, ProductWrite, WriteMode},
    error::AppResult,
    middleware::{
        auth::AuthUser,
        json::{ApiJson, PathId},
    },
    models::Product,
    response::{ApiResponse, Meta, StatusAck},
    routes::params::ProductQuery,
    services::product_service::{self, FEATURED_TOGGLED},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/", get(list_products).post(create_product))
        .route("/products/featured/", get(featured_products))
        .route(
            "/products/{id}/",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/products/{id}/toggle_featured/", post(toggle_featured))
}

#[utoipa::path(
    get,
    path = "/api/products/",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Invalid filter value")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (items, meta) = product_service::list_products(&state, &query).await?;
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/featured/",
    responses(
        (status = 200, description = "Featured products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn featured_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = product_service::featured_products(&state).await?;
    let meta = Meta::total(items.len() as i64);
    Ok(Json(ApiResponse::success(
        "Featured products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = product_service::get_product(&state, id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products/",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<ProductWrite>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = product_service::create_product(&state, Some(user.user_id), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}/",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Replaced product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn replace_product(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ApiJson(payload): ApiJson<ProductWrite>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product =
        product_service::update_product(&state, Some(user.user_id), id, payload, WriteMode::Replace)
            .await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Partially updated product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn patch_product(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
    ApiJson(payload): ApiJson<ProductWrite>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product =
        product_service::update_product(&state, Some(user.user_id), id, payload, WriteMode::Partial)
            .await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    product_service::delete_product(&state, Some(user.user_id), id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/toggle_featured/",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Featured flag flipped", body = ApiResponse<StatusAck>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn toggle_featured(
    State(state): State<AppState>,
    user: AuthUser,
    PathId(id): PathId,
) -> AppResult<Json<ApiResponse<StatusAck>>> {
    product_service::toggle_featured(&state, Some(user.user_id), id).await?;
    Ok(Json(ApiResponse::success(
        "OK",
        StatusAck::new(FEATURED_TOGGLED),
        Some(Meta::empty()),
    )))
}
