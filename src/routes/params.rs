use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        // Far-out pages saturate to an offset past every row.
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }

    /// Page bounds only when the caller asked for a page.
    pub fn requested(&self) -> Option<(i64, i64, i64)> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        Some(self.normalize())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A column a listing may be ordered by, named as it appears in `?ordering=`.
pub trait OrderingField: Sized + Copy {
    fn from_param(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

impl OrderingField for ProductSortBy {
    fn from_param(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(ProductSortBy::CreatedAt),
            "price" => Some(ProductSortBy::Price),
            "name" => Some(ProductSortBy::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySortBy {
    Name,
}

impl OrderingField for CategorySortBy {
    fn from_param(name: &str) -> Option<Self> {
        match name {
            "name" => Some(CategorySortBy::Name),
            _ => None,
        }
    }
}

/// Parse `name,-price` style ordering. Unknown fields are dropped; an empty
/// result means the caller should apply its default ordering.
pub fn parse_ordering<F: OrderingField>(raw: Option<&str>) -> Vec<(F, SortOrder)> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter_map(|term| {
            let (name, order) = match term.strip_prefix('-') {
                Some(name) => (name, SortOrder::Desc),
                None => (term, SortOrder::Asc),
            };
            F::from_param(name).map(|field| (field, order))
        })
        .collect()
}

/// Split a search string into terms on whitespace and commas.
pub fn search_terms(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.replace('\0', "")
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// `%term%` with LIKE wildcards in the term escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Exact category id.
    pub category: Option<String>,
    /// Exact price, e.g. `19.99`.
    pub price: Option<String>,
    /// Terms matched against name and description.
    pub search: Option<String>,
    /// Comma-separated `name`, `price`, `created_at`, `-` prefix for descending.
    pub ordering: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    pub search: Option<String>,
    /// `name` or `-name`.
    pub ordering: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CategoryQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Changelist filters of the admin product page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AdminProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    pub page: Option<i64>,
}

impl AdminProductQuery {
    pub fn active_filter(&self) -> Option<bool> {
        match self.is_active.as_deref().map(str::trim) {
            Some("1" | "true" | "True" | "yes") => Some(true),
            Some("0" | "false" | "False" | "no") => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AdminCategoryQuery {
    pub q: Option<String>,
}
