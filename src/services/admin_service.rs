use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs},
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult, FieldErrors},
    middleware::auth::{AuthUser, ensure_admin},
    models::{AuditEntry, Category, Product},
    response::Meta,
    routes::params::{
        AdminCategoryQuery, AdminProductQuery, Pagination, contains_pattern, search_terms,
    },
    services::product_service,
    state::AppState,
};

pub const CHANGELIST_PER_PAGE: i64 = 100;
const RECENT_ACTIONS: u64 = 10;

pub async fn recent_actions(state: &AppState, user: &AuthUser) -> AppResult<Vec<AuditEntry>> {
    ensure_admin(user)?;
    let entries = AuditLogs::find()
        .order_by_desc(AuditCol::CreatedAt)
        .limit(RECENT_ACTIONS)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AuditEntry::from)
        .collect();
    Ok(entries)
}

/// Product changelist: newest first, filtered by category and active flag.
pub async fn product_changelist(
    state: &AppState,
    user: &AuthUser,
    query: &AdminProductQuery,
) -> AppResult<(Vec<Product>, Meta)> {
    ensure_admin(user)?;

    let mut errors = FieldErrors::new();
    let mut condition = product_service::search_condition(&search_terms(query.q.as_deref()));
    if let Some(category_id) =
        product_service::category_filter(state, query.category.as_deref(), &mut errors).await?
    {
        condition = condition.add(ProductCol::CategoryId.eq(category_id));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    if let Some(active) = query.active_filter() {
        condition = condition.add(ProductCol::IsActive.eq(active));
    }

    let pagination = Pagination {
        page: query.page,
        per_page: Some(CHANGELIST_PER_PAGE),
    };
    let (page, limit, offset) = pagination.normalize();

    let total = Products::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await? as i64;

    let finder = Products::find()
        .filter(condition)
        .order_by_desc(ProductCol::CreatedAt)
        .order_by_desc(ProductCol::Id)
        .find_also_related(Categories)
        .limit(limit as u64)
        .offset(offset as u64);

    let items = product_service::load_all(state, finder).await?;
    Ok((items, Meta::new(page, limit, total)))
}

/// Category changelist, searched by name only.
pub async fn category_changelist(
    state: &AppState,
    user: &AuthUser,
    query: &AdminCategoryQuery,
) -> AppResult<Vec<Category>> {
    ensure_admin(user)?;

    let condition = search_terms(query.q.as_deref())
        .iter()
        .fold(Condition::all(), |condition, term| {
            condition.add(Expr::col((Categories, CategoryCol::Name)).ilike(contains_pattern(term)))
        });

    let items = Categories::find()
        .filter(condition)
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(items)
}
