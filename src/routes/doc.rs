use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{CategoryInput, CategoryList},
        products::{ProductInput, ProductList},
    },
    models::{Category, Product, User},
    response::{ApiResponse, Meta, StatusAck},
    routes::{auth, categories, health, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::list_products,
        products::featured_products,
        products::get_product,
        products::create_product,
        products::replace_product,
        products::patch_product,
        products::delete_product,
        products::toggle_featured,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::replace_category,
        categories::patch_category,
        categories::delete_category,
        categories::category_products
    ),
    components(
        schemas(
            User,
            Category,
            Product,
            ProductInput,
            CategoryInput,
            ProductList,
            CategoryList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            StatusAck,
            params::ProductQuery,
            params::CategoryQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<Category>,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<StatusAck>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
