use askama::Template;

use crate::{
    config::SiteConfig,
    forms::ProductForm,
    models::{AuditEntry, Category, Product},
};

#[derive(Template)]
#[template(path = "products/list.html")]
pub struct ProductListPage {
    pub site: SiteConfig,
    pub title: String,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub form: ProductForm,
}

#[derive(Template)]
#[template(path = "products/detail.html")]
pub struct ProductDetailPage {
    pub site: SiteConfig,
    pub title: String,
    pub product: Product,
}

#[derive(Template)]
#[template(path = "products/edit.html")]
pub struct ProductEditPage {
    pub site: SiteConfig,
    pub title: String,
    pub product: Product,
    pub categories: Vec<Category>,
    pub form: ProductForm,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub site: SiteConfig,
    pub title: String,
    pub status: u16,
    pub message: String,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexPage {
    pub site: SiteConfig,
    pub title: String,
    pub entries: Vec<AuditEntry>,
}

#[derive(Template)]
#[template(path = "admin/product_list.html")]
pub struct AdminProductListPage {
    pub site: SiteConfig,
    pub title: String,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub form: ProductForm,
    pub search: String,
    pub page: i64,
    pub total: i64,
}

#[derive(Template)]
#[template(path = "admin/category_list.html")]
pub struct AdminCategoryListPage {
    pub site: SiteConfig,
    pub title: String,
    pub categories: Vec<Category>,
    pub search: String,
}
